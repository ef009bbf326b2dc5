//! Rate conversion options.
//!
//! When a query asks for a rate, the server turns an absolute-value series
//! into a rate-of-change series. For monotonically increasing counters the
//! options below control how counter rollover and resets are corrected.

use std::fmt;

use serde::Serialize;

use crate::error::{QueryError, QueryResult};

/// Counter handling for rate queries.
///
/// This is a plain `Copy` value; reading it from a builder always yields an
/// independent copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOptions {
    /// Whether the series is a monotonically increasing counter.
    pub counter: bool,

    /// Maximum value of the counter before it rolls over. `None` lets the
    /// server pick its default.
    pub counter_max: Option<f64>,

    /// Rates above this value are treated as counter resets.
    pub reset_value: f64,
}

impl Default for RateOptions {
    fn default() -> Self {
        Self {
            counter: false,
            counter_max: None,
            reset_value: 0.0,
        }
    }
}

impl RateOptions {
    /// Applies a partial update key by key, in the order `counter`,
    /// `counter_max`, `reset_value`.
    ///
    /// Each key is validated and assigned before the next one is looked at,
    /// so a rejected `reset_value` leaves an accepted `counter` in place.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` if `counter_max` or
    /// `reset_value` is NaN or infinite.
    pub fn apply(&mut self, update: RateOptionsUpdate) -> QueryResult<()> {
        if let Some(counter) = update.counter {
            self.counter = counter;
        }
        if let Some(counter_max) = update.counter_max {
            self.counter_max = validate_counter_max(counter_max)?;
        }
        if let Some(reset_value) = update.reset_value {
            self.reset_value = validate_reset_value(reset_value)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_counter_max(value: Option<f64>) -> QueryResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(QueryError::invalid_argument(
            "rateOptions.counterMax",
            "Counter max must be numeric.",
        )),
        other => Ok(other),
    }
}

pub(crate) fn validate_reset_value(value: f64) -> QueryResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QueryError::invalid_argument(
            "rateOptions.resetValue",
            "ResetValue must be numeric.",
        ))
    }
}

/// Renders a number the way the query endpoint expects it: integral values
/// without a fractional part, and negative zero as `0`.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for RateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate{{{},", self.counter)?;
        if let Some(max) = self.counter_max {
            f.write_str(&format_number(max))?;
        }
        write!(f, ",{}}}", format_number(self.reset_value))
    }
}

/// A partial update of [`RateOptions`].
///
/// Every key is independently optional; absent keys leave the stored value
/// untouched. `counter_max` is doubly optional because `null` is a
/// meaningful value for it.
///
/// # Examples
///
/// ```
/// use opentsdb_query::{RateOptions, RateOptionsUpdate};
///
/// let mut opts = RateOptions::default();
/// opts.apply(RateOptionsUpdate::new().reset_value(5.0)).unwrap();
/// assert!(!opts.counter);
/// assert_eq!(opts.counter_max, None);
/// assert_eq!(opts.reset_value, 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateOptionsUpdate {
    counter: Option<bool>,
    counter_max: Option<Option<f64>>,
    reset_value: Option<f64>,
}

impl RateOptionsUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the counter flag.
    #[must_use]
    pub fn counter(mut self, counter: bool) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Set the counter maximum; `None` clears it.
    #[must_use]
    pub fn counter_max(mut self, counter_max: Option<f64>) -> Self {
        self.counter_max = Some(counter_max);
        self
    }

    /// Set the reset value.
    #[must_use]
    pub fn reset_value(mut self, reset_value: f64) -> Self {
        self.reset_value = Some(reset_value);
        self
    }

    /// Returns true if no key is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.counter.is_none() && self.counter_max.is_none() && self.reset_value.is_none()
    }
}

impl From<RateOptions> for RateOptionsUpdate {
    fn from(opts: RateOptions) -> Self {
        Self {
            counter: Some(opts.counter),
            counter_max: Some(opts.counter_max),
            reset_value: Some(opts.reset_value),
        }
    }
}
