//! Dynamic value carrier for transaction fields.
//!
//! Field assignment, defaults, choice sets, and wire payloads all move
//! through [`Value`]. Amounts are fixed-point decimals; booleans exist only
//! as input — after coercion a boolean field reads back as `Int(0)` or
//! `Int(1)` (see the field layer).

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::TxnError;

/// A single field value: unset marker, scalar input, or coerced output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicitly unset. Assigning `Null` clears a field.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Fixed-point monetary amount.
    #[serde(with = "rust_decimal::serde::str")]
    Amount(Decimal),
    Str(String),
}

impl Value {
    /// Returns the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Amount(_) => "amount",
            Value::Str(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Renders the wire text form of the value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", *b as i64),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Amount(d) => write!(f, "{}", d),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Amount(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = TxnError;

    /// Converts parsed JSON into a field value.
    ///
    /// JSON numbers become `Int` when integral, `Float` otherwise. Arrays
    /// and objects have no field representation and are rejected.
    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(x) = n.as_f64() {
                    Ok(Value::Float(x))
                } else {
                    Err(TxnError::Constraint {
                        field: "$".into(),
                        expected: "a representable number".into(),
                        actual: n.to_string(),
                    })
                }
            }
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            other => Err(TxnError::Constraint {
                field: "$".into(),
                expected: "a scalar value".into(),
                actual: json_type_name(&other).into(),
            }),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
