//! Scalar parameter values
//!
//!     Command parameters hold scalars only: strings, booleans, integers, floats and variable
//!     references. A variable reference is a string starting with `$`; it is kept apart from plain
//!     strings because the script format writes it bare, never quoted.
//!
//!     Tree documents may carry values the script syntax cannot express (objects, arrays, null).
//!     Those survive as [Value::Opaque] so that tree-to-tree handling is lossless, but the literal
//!     codec writes them as `null`.

use serde_json::Number;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// A `$`-prefixed reference, stored with its `$`.
    Variable(String),
    /// A tree value with no script literal form.
    Opaque(serde_json::Value),
}

impl Value {
    /// Build a string value, routing `$`-prefixed text to [Value::Variable].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.starts_with('$') {
            Value::Variable(s)
        } else {
            Value::String(s)
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Variable(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Value::text(s.as_str()),
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n
                    .as_f64()
                    .map(Value::Float)
                    .unwrap_or_else(|| Value::Opaque(value.clone())),
            },
            other => Value::Opaque(other.clone()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) | Value::Variable(s) => serde_json::Value::String(s.clone()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Opaque(v) => v.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::oeos::literal::encode(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_routes_variables() {
        assert_eq!(Value::text("$score"), Value::Variable("$score".to_string()));
        assert_eq!(Value::text("score"), Value::String("score".to_string()));
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from_json(&json!(3)), Value::Integer(3));
        assert_eq!(Value::from_json(&json!(2.5)), Value::Float(2.5));
    }

    #[test]
    fn test_from_json_keeps_unrepresentable_values() {
        let nested = json!({"a": [1, 2]});
        assert_eq!(Value::from_json(&nested), Value::Opaque(nested.clone()));
        assert_eq!(Value::from_json(&nested).to_json(), nested);
    }

    #[test]
    fn test_variable_serializes_as_plain_string() {
        assert_eq!(Value::text("$x").to_json(), json!("$x"));
    }
}
