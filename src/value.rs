//! Resolved scalar values
//!
//! Settings documents are loosely typed: a leaf can be a string, a boolean, a
//! number or null. The type is decided once, when the YAML node is read, and
//! carried through resolution and emission as a [`Value`] variant.

use serde::Serialize;
use serde_yaml::Value as YamlValue;
use std::fmt;

/// A resolved scalar taken from the settings document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Null,
}

/// The inferred output type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Bool,
    Int,
    Float,
    Null,
}

impl Value {
    /// Convert a YAML leaf into a `Value`.
    ///
    /// Returns `None` for sequences and mappings, which are not scalars.
    /// Tagged nodes (`!foo bar`) are unwrapped to their inner value.
    pub fn from_yaml(value: &YamlValue) -> Option<Self> {
        match value {
            YamlValue::Null => Some(Value::Null),
            YamlValue::Bool(b) => Some(Value::Bool(*b)),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Value::Int(i))
                } else {
                    n.as_f64().map(Value::Float)
                }
            }
            YamlValue::String(s) => Some(Value::String(s.clone())),
            YamlValue::Tagged(tagged) => Self::from_yaml(&tagged.value),
            YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Null => ValueType::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Plain textual form, as written into build settings and log lines.
///
/// Floats always carry a fractional part (`1.0`, not `1`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
