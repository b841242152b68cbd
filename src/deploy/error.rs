// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers remote failures, malformed input, failed stacks, and poll timeouts.

use std::time::Duration;

use crate::remote::RemoteError;
use crate::status::StackStatus;
use crate::template::TemplateError;
use crate::types::{StackId, StackNameError};

/// Errors that can occur while deploying a stack.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A remote call failed with something other than a recognized benign error.
    #[error("stack service call failed: {0}")]
    Remote(#[from] RemoteError),

    /// The template could not be turned into a request body.
    #[error("malformed template input: {0}")]
    MalformedInput(#[from] TemplateError),

    /// No usable stack name was given or derivable.
    #[error("invalid stack name: {0}")]
    InvalidStackName(#[from] StackNameError),

    /// The stack settled in a state other than a successful create or update.
    #[error(
        "stack {stack} finished with status {status}{}",
        .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
    )]
    DeploymentFailed {
        stack: String,
        stack_id: StackId,
        status: StackStatus,
        reason: Option<String>,
    },

    /// Polling exceeded the configured bound.
    #[error("gave up waiting for stack {stack} after {}s", .after.as_secs())]
    Timeout { stack: String, after: Duration },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Remote,
    MalformedInput,
    DeploymentFailed,
    Timeout,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Remote(_) => DeployErrorKind::Remote,
            DeployError::MalformedInput(_) | DeployError::InvalidStackName(_) => {
                DeployErrorKind::MalformedInput
            }
            DeployError::DeploymentFailed { .. } => DeployErrorKind::DeploymentFailed,
            DeployError::Timeout { .. } => DeployErrorKind::Timeout,
        }
    }

    /// Terminal stack status, when the failure came from the stack itself.
    pub fn stack_status(&self) -> Option<&StackStatus> {
        match self {
            DeployError::DeploymentFailed { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Id of the stack that failed, once the service had assigned one.
    pub fn stack_id(&self) -> Option<&StackId> {
        match self {
            DeployError::DeploymentFailed { stack_id, .. } => Some(stack_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_failed_message_includes_reason() {
        let err = DeployError::DeploymentFailed {
            stack: "web".to_string(),
            stack_id: StackId::new("arn:stack/web/1"),
            status: StackStatus::new("ROLLBACK_COMPLETE"),
            reason: Some("The following resource(s) failed to create: [Bucket].".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "stack web finished with status ROLLBACK_COMPLETE: The following resource(s) failed to create: [Bucket]."
        );
        assert_eq!(err.kind(), DeployErrorKind::DeploymentFailed);
        assert_eq!(err.stack_id().map(StackId::as_str), Some("arn:stack/web/1"));
    }

    #[test]
    fn deployment_failed_without_reason() {
        let err = DeployError::DeploymentFailed {
            stack: "web".to_string(),
            stack_id: StackId::new("arn:stack/web/1"),
            status: StackStatus::new("DELETE_COMPLETE"),
            reason: None,
        };
        assert_eq!(err.to_string(), "stack web finished with status DELETE_COMPLETE");
    }

    #[test]
    fn remote_errors_convert() {
        let err: DeployError = RemoteError::other("Throttling", "Rate exceeded").into();
        assert_eq!(err.kind(), DeployErrorKind::Remote);
        assert!(err.stack_status().is_none());
        assert!(err.stack_id().is_none());
    }
}
