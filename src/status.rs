// ABOUTME: Structural classification of remote stack status codes.
// ABOUTME: Status codes stay open strings; predicates match on suffixes and substrings.

use serde::{Deserialize, Serialize};
use std::fmt;

const IN_PROGRESS_SUFFIX: &str = "_IN_PROGRESS";
const CLEANUP_IN_PROGRESS_SUFFIX: &str = "_CLEANUP_IN_PROGRESS";
const FAILED_SUFFIX: &str = "FAILED";
const FAILURE_MARKERS: [&str; 3] = ["ROLLBACK", "DELETE", "FAILED"];

/// Status code reported by the orchestration service for a stack or resource.
///
/// The remote vocabulary grows over time, so this is a string with
/// classification predicates rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackStatus(String);

impl StackStatus {
    pub const CREATE_IN_PROGRESS: &'static str = "CREATE_IN_PROGRESS";
    pub const UPDATE_IN_PROGRESS: &'static str = "UPDATE_IN_PROGRESS";
    pub const DELETE_COMPLETE: &'static str = "DELETE_COMPLETE";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Something is still happening on the stack.
    pub fn is_in_progress(&self) -> bool {
        self.0.ends_with(IN_PROGRESS_SUFFIX)
    }

    /// The primary outcome is settled and superseded resources are being torn down.
    pub fn is_cleanup_in_progress(&self) -> bool {
        self.0.ends_with(CLEANUP_IN_PROGRESS_SUFFIX)
    }

    /// The operation is rolling back, deleting, or has failed somewhere.
    pub fn indicates_failure(&self) -> bool {
        FAILURE_MARKERS.iter().any(|marker| self.0.contains(marker))
    }

    /// A create or update finished and was not rolled back.
    pub fn is_successful_completion(&self) -> bool {
        (self.0.starts_with("CREATE") || self.0.starts_with("UPDATE"))
            && self.0.contains("COMPLETE")
            && !self.0.contains("ROLLBACK")
    }

    pub fn is_failed(&self) -> bool {
        self.0.ends_with(FAILED_SUFFIX)
    }

    pub fn is_deleted(&self) -> bool {
        self.0 == Self::DELETE_COMPLETE
    }

    /// Marks the first stack-level event of a create or update operation.
    pub fn is_operation_start(&self) -> bool {
        self.0 == Self::CREATE_IN_PROGRESS || self.0 == Self::UPDATE_IN_PROGRESS
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StackStatus {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StackStatus {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
