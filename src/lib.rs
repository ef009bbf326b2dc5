//! # opentsdb-query - validated OpenTSDB sub-query strings
//!
//! Builds the operator part of an OpenTSDB metric sub-query: the
//! aggregator, an optional rate conversion with counter handling, and an
//! optional downsample specification. Every value is validated when it is
//! set, and the builder renders the compact `m=` fragment on demand.
//!
//! ## Core Concepts
//!
//! - **Aggregator**: server-side function combining series into one (`avg`, `sum`, ...)
//! - **Rate**: converts absolute values into a rate of change
//! - **RateOptions**: counter rollover and reset handling for rates
//! - **Downsample**: bucketed resolution reduction, `{value}{units}-{operator}`
//!
//! ## Usage
//!
//! ```
//! use opentsdb_query::{QueryBuilder, RateOptionsUpdate};
//!
//! let mut query = QueryBuilder::new();
//! query
//!     .set_aggregator("sum")
//!     .set_downsample(Some("5m-avg"))?
//!     .set_rate(true)
//!     .set_rate_options(
//!         RateOptionsUpdate::new()
//!             .counter(true)
//!             .counter_max(Some(5000.0))
//!             .reset_value(5.0),
//!     )?;
//!
//! assert_eq!(query.serialize(), "sum:rate{true,5000,5}:5m-avg");
//! # Ok::<(), opentsdb_query::QueryError>(())
//! ```
//!
//! Query descriptions that arrive as JSON go through the loosely typed
//! setters, which report values of the wrong type:
//!
//! ```
//! use opentsdb_query::QueryBuilder;
//!
//! let query = QueryBuilder::from_json(r#"{"aggregator": "max", "rate": true}"#)?;
//! assert_eq!(query.to_string(), "max:rate{false,,0}");
//!
//! let err = QueryBuilder::from_json(r#"{"rate": "yes"}"#).unwrap_err();
//! assert!(err.is_invalid_argument());
//! # Ok::<(), opentsdb_query::QueryError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod downsample;
pub mod error;
pub mod json;
pub mod query;
pub mod rate;

// Re-export primary types at crate root for convenience
pub use downsample::{Downsample, TimeUnit};
pub use error::{QueryError, QueryResult};
pub use query::{QueryBuilder, DEFAULT_AGGREGATOR};
pub use rate::{RateOptions, RateOptionsUpdate};
