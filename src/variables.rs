//! Substitution variables
//!
//! Entries of the `natrium_variables` category are collected before anything
//! else is resolved. Every string chosen afterwards has its `${name}`
//! references replaced by the collected values.
//!
//! Substitution is single-level: text inserted for a reference is not scanned
//! again, so a variable whose value contains `${other}` is inserted verbatim.
//! References to unknown names are left untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::resolved::OrderedMap;
use crate::value::Value;

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^${}]+)\}").expect("variable reference pattern is valid"));

/// Named substitution variables collected during the variables-only pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    variables: OrderedMap<Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a variable, replacing any earlier value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter()
    }

    /// Replace every `${name}` in `input` with the value of `name`.
    pub fn substitute(&self, input: &str) -> String {
        if self.variables.is_empty() || !input.contains("${") {
            return input.to_string();
        }
        REFERENCE
            .replace_all(input, |caps: &Captures<'_>| match self.variables.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Apply [`substitute`](Self::substitute) to string values; other
    /// values are returned unchanged.
    pub fn substitute_value(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.substitute(&s)),
            other => other,
        }
    }
}
