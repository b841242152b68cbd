// ABOUTME: Snapshots returned by the orchestration service.
// ABOUTME: Stack state, stack outputs, and resource events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::StackStatus;
use crate::types::StackId;

/// One stack output pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: String,
    pub output_value: String,
}

impl StackOutput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            output_key: key.into(),
            output_value: value.into(),
        }
    }
}

/// Stack state as of one describe call. Re-fetched on every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackState {
    pub stack_id: StackId,
    pub stack_name: String,
    pub stack_status: StackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_status_reason: Option<String>,
    #[serde(default)]
    pub outputs: Vec<StackOutput>,
}

impl StackState {
    pub fn new(stack_id: StackId, stack_name: impl Into<String>, status: impl Into<StackStatus>) -> Self {
        Self {
            stack_id,
            stack_name: stack_name.into(),
            stack_status: status.into(),
            stack_status_reason: None,
            outputs: Vec::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.stack_status_reason = Some(reason.into());
        self
    }

    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.push(StackOutput::new(key, value));
        self
    }
}

/// A resource status transition recorded by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEvent {
    #[serde(default)]
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_type: String,
    pub resource_status: StackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_status_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl StackEvent {
    pub fn new(
        logical_resource_id: impl Into<String>,
        resource_type: impl Into<String>,
        resource_status: impl Into<StackStatus>,
    ) -> Self {
        Self {
            logical_resource_id: logical_resource_id.into(),
            physical_resource_id: None,
            resource_type: resource_type.into(),
            resource_status: resource_status.into(),
            resource_status_reason: None,
            timestamp: None,
        }
    }

    pub fn with_physical_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.resource_status_reason = Some(reason.into());
        self
    }

    /// Whether this event describes the stack itself rather than one of its resources.
    pub fn is_stack_event(&self, stack_id: &StackId) -> bool {
        self.physical_resource_id.as_deref() == Some(stack_id.as_str())
    }
}
