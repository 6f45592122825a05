//! Loosely typed values of a legacy query body.

use std::collections::BTreeMap;

use crate::snql::scalar::Scalar;

/// A legacy request body: top-level field name to value.
pub type Body = BTreeMap<String, LegacyValue>;

/// A JSON-like value that can also carry tuples.
///
/// Lists and tuples render differently once coerced (`array(...)` versus
/// `tuple(...)`), so callers that build bodies in code keep the distinction.
/// Bodies decoded from JSON only ever contain lists.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<LegacyValue>),
    Tuple(Vec<LegacyValue>),
    Map(BTreeMap<String, LegacyValue>),
}

impl LegacyValue {
    /// Truthiness as the legacy format understands it: null, `false`, zero
    /// and empty strings or containers are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            LegacyValue::Null => false,
            LegacyValue::Bool(b) => *b,
            LegacyValue::Int(n) => *n != 0,
            LegacyValue::Float(f) => *f != 0.0,
            LegacyValue::String(s) => !s.is_empty(),
            LegacyValue::List(items) | LegacyValue::Tuple(items) => !items.is_empty(),
            LegacyValue::Map(map) => !map.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LegacyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LegacyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            LegacyValue::Null => "null",
            LegacyValue::Bool(_) => "bool",
            LegacyValue::Int(_) => "int",
            LegacyValue::Float(_) => "float",
            LegacyValue::String(_) => "str",
            LegacyValue::List(_) => "list",
            LegacyValue::Tuple(_) => "tuple",
            LegacyValue::Map(_) => "map",
        }
    }

    /// Structural conversion to an uncoerced scalar.
    ///
    /// Maps have no scalar form and yield `None`, including when nested.
    pub fn to_raw_scalar(&self) -> Option<Scalar> {
        Some(match self {
            LegacyValue::Null => Scalar::Null,
            LegacyValue::Bool(b) => Scalar::Bool(*b),
            LegacyValue::Int(n) => Scalar::Int(*n),
            LegacyValue::Float(f) => Scalar::Float(*f),
            LegacyValue::String(s) => Scalar::String(s.clone()),
            LegacyValue::List(items) => Scalar::Array(
                items
                    .iter()
                    .map(LegacyValue::to_raw_scalar)
                    .collect::<Option<_>>()?,
            ),
            LegacyValue::Tuple(items) => Scalar::Tuple(
                items
                    .iter()
                    .map(LegacyValue::to_raw_scalar)
                    .collect::<Option<_>>()?,
            ),
            LegacyValue::Map(_) => return None,
        })
    }
}

impl From<serde_json::Value> for LegacyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => LegacyValue::Null,
            serde_json::Value::Bool(b) => LegacyValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => LegacyValue::Int(i),
                None => LegacyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => LegacyValue::String(s),
            serde_json::Value::Array(items) => {
                LegacyValue::List(items.into_iter().map(LegacyValue::from).collect())
            }
            serde_json::Value::Object(map) => LegacyValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, LegacyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for LegacyValue {
    fn from(s: &str) -> Self {
        LegacyValue::String(s.into())
    }
}

impl From<i64> for LegacyValue {
    fn from(n: i64) -> Self {
        LegacyValue::Int(n)
    }
}

impl From<bool> for LegacyValue {
    fn from(b: bool) -> Self {
        LegacyValue::Bool(b)
    }
}

impl From<f64> for LegacyValue {
    fn from(f: f64) -> Self {
        LegacyValue::Float(f)
    }
}
