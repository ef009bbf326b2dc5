//! The query builder.
//!
//! A [`QueryBuilder`] accumulates the operator part of an OpenTSDB
//! sub-query (aggregator, optional rate conversion, optional downsampling)
//! and renders it as the compact `m=` fragment the HTTP API expects.

use std::fmt;

use serde::Serialize;

use crate::downsample::Downsample;
use crate::error::QueryResult;
use crate::rate::{RateOptions, RateOptionsUpdate};

/// Aggregator used by a freshly constructed builder.
pub const DEFAULT_AGGREGATOR: &str = "avg";

/// Fluent builder for a time-series query specification.
///
/// Setters take `&mut self` and hand the builder back, so calls chain left
/// to right. Setters that validate return a [`QueryResult`].
///
/// # Example
/// ```
/// use opentsdb_query::{QueryBuilder, RateOptionsUpdate};
///
/// let mut query = QueryBuilder::new();
/// query
///     .set_aggregator("sum")
///     .set_downsample(Some("5m-avg"))?
///     .set_rate(true)
///     .set_rate_options(RateOptionsUpdate::new().counter(true).reset_value(5.0))?;
///
/// assert_eq!(query.serialize(), "sum:rate{true,,5}:5m-avg");
/// # Ok::<(), opentsdb_query::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBuilder {
    aggregator: String,
    downsample: Option<Downsample>,
    rate: bool,
    rate_options: RateOptions,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            aggregator: DEFAULT_AGGREGATOR.to_string(),
            downsample: None,
            rate: false,
            rate_options: RateOptions::default(),
        }
    }
}

impl QueryBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the server-side aggregation function.
    #[must_use]
    pub fn aggregator(&self) -> &str {
        &self.aggregator
    }

    /// Set the aggregator.
    ///
    /// The name is not checked against a whitelist; the server decides
    /// which aggregators exist.
    pub fn set_aggregator(&mut self, aggregator: impl Into<String>) -> &mut Self {
        self.aggregator = aggregator.into();
        self
    }

    /// The downsample specification, if downsampling is enabled.
    #[must_use]
    pub fn downsample(&self) -> Option<&str> {
        self.downsample.as_ref().map(Downsample::as_str)
    }

    /// The parsed downsample specification.
    #[must_use]
    pub const fn downsample_spec(&self) -> Option<&Downsample> {
        self.downsample.as_ref()
    }

    /// Set or clear the downsample specification.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidFormat` if the specification does not
    /// follow `{value}{units}-{operator}`. The stored value is unchanged.
    pub fn set_downsample(&mut self, downsample: Option<&str>) -> QueryResult<&mut Self> {
        self.downsample = downsample.map(Downsample::parse).transpose()?;
        Ok(self)
    }

    /// Set or clear an already validated downsample specification.
    pub fn set_downsample_spec(&mut self, downsample: Option<Downsample>) -> &mut Self {
        self.downsample = downsample;
        self
    }

    /// Whether the series is converted to a rate of change.
    #[must_use]
    pub const fn rate(&self) -> bool {
        self.rate
    }

    /// Set the rate flag.
    pub fn set_rate(&mut self, rate: bool) -> &mut Self {
        self.rate = rate;
        self
    }

    /// A copy of the current rate options.
    ///
    /// Mutating the returned value never affects the builder.
    #[must_use]
    pub const fn rate_options(&self) -> RateOptions {
        self.rate_options
    }

    /// Update the rate options. Only keys present in `update` change.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` if `counter_max` or
    /// `reset_value` is not a finite number. Keys preceding the rejected
    /// one have already been applied.
    pub fn set_rate_options(&mut self, update: RateOptionsUpdate) -> QueryResult<&mut Self> {
        self.rate_options.apply(update)?;
        Ok(self)
    }

    pub(crate) fn rate_options_mut(&mut self) -> &mut RateOptions {
        &mut self.rate_options
    }

    /// Renders the query fragment: aggregator, then the rate block if rate
    /// is enabled, then the downsample specification if one is set.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.aggregator)?;
        if self.rate {
            write!(f, ":{}", self.rate_options)?;
        }
        if let Some(downsample) = &self.downsample {
            write!(f, ":{downsample}")?;
        }
        Ok(())
    }
}
