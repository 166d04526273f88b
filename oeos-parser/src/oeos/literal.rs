//! Literal codec
//!
//!     Maps parameter values to and from their OEOScript spelling:
//!
//!         "text"      JSON-escaped string
//!         $name       variable reference, bare when it is a plain dotted name
//!         true/false  boolean
//!         12, -3.5    integer / float
//!
//!     Decoding never fails. A token that is none of the above comes back as a raw string, which
//!     keeps scripts that lean on that laxity loading the way they always have. Encoding is not
//!     total: values with no literal form are written as `null`.

use crate::oeos::ast::Value;

/// A double-quoted literal with backslash escapes.
pub const QUOTED_PATTERN: &str = r#""(?:[^"\\]|\\.)*""#;

/// Any literal a named argument accepts.
pub const LITERAL_PATTERN: &str =
    r#""(?:[^"\\]|\\.)*"|true|false|-?\d+\.?\d*(?:[eE][+-]?\d+)?|\$\S+"#;

pub fn encode(value: &Value) -> String {
    match value {
        Value::String(s) | Value::Variable(s) if is_bare_variable(s) => s.clone(),
        Value::String(s) | Value::Variable(s) => quote(s),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => encode_float(*f),
        Value::Opaque(raw) => {
            tracing::warn!(value = %raw, "value has no script literal, writing null");
            "null".to_string()
        }
    }
}

pub fn decode(token: &str) -> Value {
    let token = token.trim();
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        if let Ok(s) = serde_json::from_str::<String>(token) {
            return Value::text(s);
        }
    }
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if token.starts_with('$') {
        return Value::Variable(token.to_string());
    }
    if let Ok(i) = token.parse::<i64>() {
        return Value::Integer(i);
    }
    match token.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Float(f),
        _ => Value::String(token.to_string()),
    }
}

// Only plain dotted names are written bare. Any other reference is quoted, and decoding the
// quoted form still yields a variable.
fn is_bare_variable(s: &str) -> bool {
    s.strip_prefix('$').is_some_and(|name| {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '$')
    })
}

/// JSON string literal, non-ASCII left as is.
pub fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

// Debug formatting keeps a fractional part or exponent, so floats never decode back as integers.
fn encode_float(f: f64) -> String {
    if f.is_finite() {
        format!("{:?}", f)
    } else {
        "null".to_string()
    }
}
