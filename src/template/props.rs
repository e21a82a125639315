use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::foundation::format::js_number;

/// Ordered property mapping. Iteration order is insertion order, which the template engine
/// relies on.
pub type PropMap = IndexMap<String, PropValue>;

/// A scalar property value as it appears in `defaultProps` or instance `props`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// JSON boolean.
    Bool(bool),
    /// JSON number, kept as parsed so integers stay integers on output.
    Number(serde_json::Number),
    /// JSON string.
    Text(String),
}

impl PropValue {
    /// Build a numeric value. Non-finite input becomes `0`.
    pub fn number(v: f64) -> Self {
        Self::Number(serde_json::Number::from_f64(v).unwrap_or_else(|| 0u8.into()))
    }

    /// Truthiness used by conditional placeholders: `false`, `0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric view: numbers as-is, numeric strings parsed, booleans as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Convert an arbitrary JSON value. Only scalars are representable.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => Some(Self::Number(n.clone())),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    write!(f, "{n}")
                } else {
                    f.write_str(&js_number(n.as_f64().unwrap_or(0.0)))
                }
            }
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        Self::Number(v.into())
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Number(v.into())
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::number(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Merge instance overrides over component defaults.
///
/// Keys keep the position they have in `defaults`; keys only present in `overrides` are
/// appended in their own order.
pub fn merge_props(defaults: &PropMap, overrides: Option<&PropMap>) -> PropMap {
    let mut merged = defaults.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
#[path = "../../tests/unit/template/props.rs"]
mod tests;
