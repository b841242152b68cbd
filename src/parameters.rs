// ABOUTME: Merges structured stack parameters with a flat key/value map.
// ABOUTME: Produces the parameter list format the orchestration service expects.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One entry of the service's parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(alias = "key")]
    pub parameter_key: String,

    #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
    pub parameter_value: Option<String>,

    #[serde(default, alias = "use_previous_value", skip_serializing_if = "Option::is_none")]
    pub use_previous_value: Option<bool>,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter_key: key.into(),
            parameter_value: Some(value.into()),
            use_previous_value: None,
        }
    }
}

/// A scalar parameter value as written by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Integer(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => write!(f, "{x}"),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

/// Flat parameter map that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<(String, ScalarValue)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ScalarValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ScalarValue>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Append one parameter per map entry after the existing list.
///
/// Keys are not deduplicated; the service validates duplicates itself.
pub fn merge_parameters(existing: Option<&[Parameter]>, map: &ParameterMap) -> Vec<Parameter> {
    existing
        .unwrap_or_default()
        .iter()
        .cloned()
        .chain(map.iter().map(|(k, v)| Parameter::new(k, v.to_string())))
        .collect()
}

/// Keys that appear more than once in a parameter list, in first-repeat order.
pub fn duplicate_keys(parameters: &[Parameter]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for p in parameters {
        if !seen.insert(p.parameter_key.as_str()) && !duplicates.contains(&p.parameter_key) {
            duplicates.push(p.parameter_key.clone());
        }
    }
    duplicates
}
