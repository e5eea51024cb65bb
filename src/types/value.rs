//! Literal values appearing in query predicates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::ty::{seq_type, Type};

/// Literal value container used by `value` expressions.
///
/// Deserializes from the plain JSON the query builder stores
/// (`true`, `42`, `1.5`, `"text"`, `["a", "b"]`). Dates are constructed
/// programmatically and serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer value.
    Int64(i64),
    /// 64-bit floating point value.
    Float64(f64),
    /// String value.
    String(String),
    /// Calendar date.
    #[serde(skip_deserializing)]
    Date(NaiveDate),
    /// Multiple alternatives, used with `equal` / `notEqual`.
    List(Vec<String>),
}

impl Literal {
    /// Returns the type of this literal.
    ///
    /// Lists are typed as `seq text`: each element is one alternative.
    #[must_use]
    pub fn ty(&self) -> Type {
        match self {
            Literal::Bool(_) => Type::boolean(),
            Literal::Int64(_) | Literal::Float64(_) => Type::number(),
            Literal::String(_) => Type::text(),
            Literal::Date(_) => Type::date(),
            Literal::List(_) => seq_type(Type::text()),
        }
    }

    /// Returns true for list literals.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Literal::List(_))
    }

    /// Returns true for string literals.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Literal::String(_))
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Converts the literal into its wire representation.
    ///
    /// Non-finite floats have no JSON form and lower to `null`.
    #[must_use]
    pub fn to_wire(&self) -> JsonValue {
        match self {
            Literal::Bool(b) => JsonValue::Bool(*b),
            Literal::Int64(i) => JsonValue::from(*i),
            Literal::Float64(f) => serde_json::Number::from_f64(*f)
                .map_or(JsonValue::Null, JsonValue::Number),
            Literal::String(s) => JsonValue::String(s.clone()),
            Literal::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Literal::List(items) => {
                JsonValue::Array(items.iter().cloned().map(JsonValue::String).collect())
            }
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int64(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float64(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<NaiveDate> for Literal {
    fn from(value: NaiveDate) -> Self {
        Literal::Date(value)
    }
}

impl From<Vec<String>> for Literal {
    fn from(value: Vec<String>) -> Self {
        Literal::List(value)
    }
}
