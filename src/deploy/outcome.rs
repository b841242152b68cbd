// ABOUTME: Terminal result of a deployment.
// ABOUTME: Flattens stack outputs into a simple key to value mapping.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;

use crate::remote::{StackOutput, StackState};
use crate::status::StackStatus;
use crate::types::StackId;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Outcome {
    pub success: bool,
    pub stack_id: StackId,
    pub status: StackStatus,
    pub simplified_outputs: OutputMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Outcome {
    /// Classify a settled stack. Outputs are only kept for successful stacks.
    pub fn from_state(state: &StackState) -> Self {
        let success = state.stack_status.is_successful_completion();
        Outcome {
            success,
            stack_id: state.stack_id.clone(),
            status: state.stack_status.clone(),
            simplified_outputs: if success {
                simplify_outputs(&state.outputs)
            } else {
                OutputMap::default()
            },
            failure_reason: (!success).then(|| {
                state
                    .stack_status_reason
                    .clone()
                    .unwrap_or_else(|| state.stack_status.to_string())
            }),
        }
    }
}

/// Stack outputs keyed by name, in the order the service listed them.
///
/// Serializes as a JSON object with keys in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputMap {
    entries: Vec<(String, String)>,
}

impl OutputMap {
    /// A repeated key keeps its first position and takes the later value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OutputMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OutputMap::default();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Index<&str> for OutputMap {
    type Output = String;

    fn index(&self, key: &str) -> &String {
        match self.entries.iter().find(|(k, _)| k == key) {
            Some((_, value)) => value,
            None => panic!("no output named {key}"),
        }
    }
}

impl Serialize for OutputMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Later duplicate keys overwrite earlier ones.
pub fn simplify_outputs(outputs: &[StackOutput]) -> OutputMap {
    outputs
        .iter()
        .map(|o| (o.output_key.clone(), o.output_value.clone()))
        .collect()
}
