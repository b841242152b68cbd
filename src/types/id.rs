// ABOUTME: Stack identifier assigned by the orchestration service.
// ABOUTME: Stable for the stack's lifetime, unlike the reusable stack name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service-assigned stack identifier.
///
/// Every call after submission addresses the stack by this id, so a stack
/// deleted and recreated under the same name is never confused with ours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use]
pub struct StackId(String);

impl StackId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
