//! Downsample specifications.
//!
//! A downsample specification tells the server to reduce the resolution of
//! a series by aggregating every bucket of `{interval}{unit}` with an
//! operator, written `{interval}{unit}-{operator}` (e.g. `5m-avg`).

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

const DOWNSAMPLE_PATTERN: &str = r"^[0-9]+(ms|s|m|h|d|w|n|y)-[a-z]+$";

const DOWNSAMPLE_EXPECTED: &str =
    "The downsample format follows the convention: {value}{units}-{operator}; e.g., `5m-avg`.";

fn downsample_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(DOWNSAMPLE_PATTERN).expect("downsample pattern compiles"))
}

/// Bucket unit of a downsample specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    /// Calendar month (`n`).
    Months,
    /// Calendar year (`y`).
    Years,
}

impl TimeUnit {
    /// The suffix used in the wire format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
            Self::Weeks => "w",
            Self::Months => "n",
            Self::Years => "y",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "ms" => Self::Milliseconds,
            "s" => Self::Seconds,
            "m" => Self::Minutes,
            "h" => Self::Hours,
            "d" => Self::Days,
            "w" => Self::Weeks,
            "n" => Self::Months,
            "y" => Self::Years,
            _ => return None,
        })
    }

    /// Returns true for units whose length depends on the calendar.
    #[must_use]
    pub const fn is_calendar(&self) -> bool {
        matches!(self, Self::Months | Self::Years)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated downsample specification.
///
/// The original text is kept verbatim, so `"05m-avg"` reads back as
/// `"05m-avg"`.
///
/// # Examples
///
/// ```
/// use opentsdb_query::{Downsample, TimeUnit};
///
/// let ds = Downsample::parse("5m-avg").unwrap();
/// assert_eq!(ds.interval(), Some(5));
/// assert_eq!(ds.unit(), TimeUnit::Minutes);
/// assert_eq!(ds.operator(), "avg");
///
/// assert!(Downsample::parse("5m-AVG").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Downsample {
    raw: String,
    unit: TimeUnit,
    interval: Option<u64>,
    operator_start: usize,
}

impl Downsample {
    /// Validates `spec` against the downsample grammar.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidFormat` if `spec` does not match
    /// `{digits}{unit}-{operator}`.
    pub fn parse(spec: &str) -> QueryResult<Self> {
        if !downsample_regex().is_match(spec) {
            return Err(QueryError::InvalidFormat {
                field: "downsample",
                value: spec.to_string(),
                expected: DOWNSAMPLE_EXPECTED,
            });
        }

        // The grammar guarantees exactly one '-' separating bucket and operator.
        let (bucket, _) = spec.split_once('-').unwrap_or((spec, ""));
        let digits_end = bucket
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(bucket.len());
        let unit = TimeUnit::from_suffix(&bucket[digits_end..]).ok_or_else(|| {
            QueryError::InvalidFormat {
                field: "downsample",
                value: spec.to_string(),
                expected: DOWNSAMPLE_EXPECTED,
            }
        })?;

        Ok(Self {
            raw: spec.to_string(),
            unit,
            interval: bucket[..digits_end].parse().ok(),
            operator_start: bucket.len() + 1,
        })
    }

    /// The specification exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Bucket unit.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Number of units per bucket, or `None` if it does not fit in a `u64`.
    #[must_use]
    pub const fn interval(&self) -> Option<u64> {
        self.interval
    }

    /// The aggregation operator applied to each bucket.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.raw[self.operator_start..]
    }

    /// Fixed bucket width.
    ///
    /// Returns `None` for calendar units (months, years) and for intervals
    /// too large to represent.
    #[must_use]
    pub fn bucket(&self) -> Option<Duration> {
        let n = i64::try_from(self.interval?).ok()?;
        match self.unit {
            TimeUnit::Milliseconds => Duration::try_milliseconds(n),
            TimeUnit::Seconds => Duration::try_seconds(n),
            TimeUnit::Minutes => Duration::try_minutes(n),
            TimeUnit::Hours => Duration::try_hours(n),
            TimeUnit::Days => Duration::try_days(n),
            TimeUnit::Weeks => Duration::try_weeks(n),
            TimeUnit::Months | TimeUnit::Years => None,
        }
    }
}

impl fmt::Display for Downsample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Downsample {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Downsample {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Downsample> for String {
    fn from(value: Downsample) -> Self {
        value.raw
    }
}
