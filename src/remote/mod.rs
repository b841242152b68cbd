// ABOUTME: Client-side view of the remote orchestration service.
// ABOUTME: Defines the StackService trait the engine drives, plus the HTTP adapter.

mod error;
mod http;
mod types;

pub use error::{NO_UPDATES_MESSAGE, RemoteError, RemoteErrorKind};
pub use http::HttpStackService;
pub use types::{StackEvent, StackOutput, StackState};

use async_trait::async_trait;

use crate::deploy::DeployRequest;
use crate::types::StackId;

/// Operations the deployment engine needs from the orchestration service.
#[async_trait]
pub trait StackService: Send + Sync {
    /// Describe a stack by name or identifier.
    async fn describe_stack(&self, name_or_id: &str) -> Result<StackState, RemoteError>;

    /// Start creating a stack.
    async fn create_stack(&self, request: &DeployRequest) -> Result<StackId, RemoteError>;

    /// Start updating an existing stack.
    async fn update_stack(&self, request: &DeployRequest) -> Result<StackId, RemoteError>;

    /// Full event log for a stack, newest first.
    async fn list_stack_events(&self, stack_id: &StackId) -> Result<Vec<StackEvent>, RemoteError>;
}
