//! Scalar literals and their coercion rules.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::token::{Token, ToTokens, TokenStream};

/// Exact shape accepted as a date-time: `YYYY-MM-DDTHH:MM:SS.ffffff`.
static DATETIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}$").unwrap());

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
    /// Ordered sequence, rendered as `array(...)`
    Array(Vec<Scalar>),
    /// Fixed tuple, rendered as `tuple(...)`
    Tuple(Vec<Scalar>),
}

impl Scalar {
    /// Normalize a raw literal.
    ///
    /// Arrays and tuples are coerced element-wise. A string that parses as an
    /// exact microsecond date-time becomes [`Scalar::DateTime`]; any other
    /// string is kept as-is. Coercing an already coerced value is a no-op.
    pub fn coerce(self) -> Scalar {
        match self {
            Scalar::Array(items) => Scalar::Array(items.into_iter().map(Scalar::coerce).collect()),
            Scalar::Tuple(items) => Scalar::Tuple(items.into_iter().map(Scalar::coerce).collect()),
            Scalar::String(s) => match parse_datetime(&s) {
                Some(dt) => Scalar::DateTime(dt),
                None => Scalar::String(s),
            },
            other => other,
        }
    }

    /// Short type name used in validation errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "str",
            Scalar::DateTime(_) => "datetime",
            Scalar::Array(_) => "array",
            Scalar::Tuple(_) => "tuple",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

/// Parse the exact `YYYY-MM-DDTHH:MM:SS.ffffff` form.
///
/// Returns `None` for anything else, including calendar-invalid dates.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if !DATETIME_PATTERN.is_match(s) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).ok()
}

impl ToTokens for Scalar {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Scalar::Null => {
                ts.push(Token::LitNull);
            }
            Scalar::Bool(b) => {
                ts.push(Token::LitBool(*b));
            }
            Scalar::Int(n) => {
                ts.push(Token::LitInt(*n));
            }
            Scalar::Float(f) => {
                ts.push(Token::LitFloat(*f));
            }
            Scalar::String(s) => {
                ts.push(Token::LitString(s.clone()));
            }
            Scalar::DateTime(dt) => {
                ts.push(Token::LitDateTime(*dt));
            }
            Scalar::Array(items) => {
                ts.push(Token::FunctionName("array".into())).lparen();
                ts.comma_separated(items).rparen();
            }
            Scalar::Tuple(items) => {
                ts.push(Token::FunctionName("tuple".into())).lparen();
                ts.comma_separated(items).rparen();
            }
        }
        ts
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.into())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(dt: NaiveDateTime) -> Self {
        Scalar::DateTime(dt)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Scalar {
    fn from(items: Vec<T>) -> Self {
        Scalar::Array(items.into_iter().map(Into::into).collect())
    }
}
