//! Loosely typed setters and JSON query descriptions.
//!
//! Query descriptions often arrive as JSON (dashboards, config files, HTTP
//! bodies) where the type of each field is only known at runtime. The
//! setters here perform the shape checks the typed API gets for free from
//! the compiler, and report `InvalidArgument` when a value has the wrong
//! type.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::downsample::Downsample;
use crate::error::{QueryError, QueryResult};
use crate::query::QueryBuilder;
use crate::rate::{validate_counter_max, validate_reset_value};

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

impl QueryBuilder {
    /// Set the aggregator from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` unless `value` is a string.
    pub fn set_aggregator_value(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let Value::String(name) = value else {
            return Err(QueryError::invalid_argument(
                "aggregator",
                format!("Aggregator must be a string, got {}.", type_name(value)),
            ));
        };
        Ok(self.set_aggregator(name.as_str()))
    }

    /// Set or clear the downsample specification from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` unless `value` is `null` or a
    /// string, then `QueryError::InvalidFormat` if the string does not
    /// follow the downsample grammar.
    pub fn set_downsample_value(&mut self, value: &Value) -> QueryResult<&mut Self> {
        match value {
            Value::Null => Ok(self.set_downsample_spec(None)),
            Value::String(spec) => {
                let spec = Downsample::parse(spec)?;
                Ok(self.set_downsample_spec(Some(spec)))
            }
            other => Err(QueryError::invalid_argument(
                "downsample",
                format!("Downsample function must be a string, got {}.", type_name(other)),
            )),
        }
    }

    /// Set the rate flag from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` unless `value` is a boolean.
    pub fn set_rate_value(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let Some(rate) = value.as_bool() else {
            return Err(QueryError::invalid_argument(
                "rate",
                format!("Rate flag must be a boolean, got {}.", type_name(value)),
            ));
        };
        Ok(self.set_rate(rate))
    }

    /// Update the rate options from a JSON object.
    ///
    /// Recognized keys are `counter`, `counterMax` and `resetValue`; other
    /// keys are ignored. Keys are checked and applied one at a time in that
    /// order, so an invalid `resetValue` does not undo an accepted
    /// `counter`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` if `value` is not an object or
    /// a recognized key holds a value of the wrong type.
    pub fn set_rate_options_value(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let Value::Object(options) = value else {
            return Err(QueryError::invalid_argument(
                "rateOptions",
                format!("Rate options must be an object, got {}.", type_name(value)),
            ));
        };

        if let Some(counter) = options.get("counter") {
            let Some(counter) = counter.as_bool() else {
                return Err(QueryError::invalid_argument(
                    "rateOptions.counter",
                    "Counter must be a boolean flag.",
                ));
            };
            self.rate_options_mut().counter = counter;
        }

        if let Some(counter_max) = options.get("counterMax") {
            let counter_max = match counter_max {
                Value::Null => None,
                other => Some(finite_number(other).ok_or_else(|| {
                    QueryError::invalid_argument(
                        "rateOptions.counterMax",
                        "Counter max must be numeric.",
                    )
                })?),
            };
            self.rate_options_mut().counter_max = validate_counter_max(counter_max)?;
        }

        if let Some(reset_value) = options.get("resetValue") {
            let reset_value = finite_number(reset_value).ok_or_else(|| {
                QueryError::invalid_argument("rateOptions.resetValue", "ResetValue must be numeric.")
            })?;
            self.rate_options_mut().reset_value = validate_reset_value(reset_value)?;
        }

        Ok(self)
    }

    /// Apply a JSON query description.
    ///
    /// Present keys among `aggregator`, `downsample`, `rate` and
    /// `rateOptions` are applied in that order; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` if `value` is not an object,
    /// or the first error raised by a field setter. Fields applied before
    /// the failing one stay applied.
    pub fn apply_json(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let Value::Object(fields) = value else {
            return Err(QueryError::invalid_argument(
                "query",
                format!("Query description must be an object, got {}.", type_name(value)),
            ));
        };
        debug!(keys = fields.len(), "applying query description");
        self.apply_fields(fields)?;
        Ok(self)
    }

    fn apply_fields(&mut self, fields: &Map<String, Value>) -> QueryResult<()> {
        type Setter =
            for<'a, 'b> fn(&'a mut QueryBuilder, &'b Value) -> QueryResult<&'a mut QueryBuilder>;
        const SETTERS: [(&str, Setter); 4] = [
            ("aggregator", QueryBuilder::set_aggregator_value),
            ("downsample", QueryBuilder::set_downsample_value),
            ("rate", QueryBuilder::set_rate_value),
            ("rateOptions", QueryBuilder::set_rate_options_value),
        ];

        for (key, setter) in SETTERS {
            if let Some(value) = fields.get(key) {
                trace!(key, %value, "applying query field");
                setter(self, value)?;
            }
        }
        Ok(())
    }

    /// Build a query from a JSON description, starting from defaults.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Json` if `s` is not valid JSON, otherwise the
    /// errors of [`QueryBuilder::apply_json`].
    pub fn from_json(s: &str) -> QueryResult<Self> {
        let value: Value = serde_json::from_str(s)?;
        let mut query = Self::new();
        query.apply_json(&value)?;
        debug!(query = %query, "built query from JSON description");
        Ok(query)
    }

    /// Dump the builder state as a pretty JSON description that
    /// [`QueryBuilder::from_json`] reads back.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> QueryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
