// ABOUTME: Stack deployment engine.
// ABOUTME: Request building, status polling, event tracking, and outcome classification.

mod error;
mod events;
mod orchestrator;
mod outcome;
mod poll;
mod request;

pub use error::{DeployError, DeployErrorKind};
pub use events::{
    EventTracker, ResourceAction, log_failures, operation_window, retrieve_stack_events,
};
pub use orchestrator::Deployer;
pub use outcome::{OutputMap, Outcome, simplify_outputs};
pub use poll::{Backoff, WaitOptions};
pub use request::{DeployRequest, OperationKind, Tag};
