//! Nullable cell values.
//!
//! Every cell of a [`Table`](crate::domain::table::Table) is a [`Value`].
//! Numeric coercion never fails: anything that does not parse to a finite or
//! infinite number becomes [`Value::Missing`].

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The numeric payload, if this value is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerce to a number. Unparseable text becomes `Missing`.
    pub fn to_numeric(&self) -> Value {
        match self {
            Value::Number(n) if n.is_nan() => Value::Missing,
            Value::Number(n) => Value::Number(*n),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if !n.is_nan() => Value::Number(n),
                _ => Value::Missing,
            },
            Value::Missing => Value::Missing,
        }
    }

    /// Replace `Missing` with `fill`, leaving every other value untouched.
    pub fn or_fill(self, fill: Value) -> Value {
        if self.is_missing() { fill } else { self }
    }

    /// `self - rhs`; missing if either side is not a number.
    pub fn checked_sub(&self, rhs: &Value) -> Value {
        match (self.as_number(), rhs.as_number()) {
            (Some(a), Some(b)) => Value::Number(a - b),
            _ => Value::Missing,
        }
    }

    /// Text form used for grouping and join keys.
    pub fn key_text(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}
