// ABOUTME: In-memory StackService driven by queued responses.
// ABOUTME: Records every request so tests can assert on call order and payloads.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use stackpilot::deploy::DeployRequest;
use stackpilot::remote::{RemoteError, StackEvent, StackService, StackState};
use stackpilot::types::StackId;

pub const STACK_ID: &str = "arn:aws:cloudformation:us-east-1:123456789012:stack/web/1";

pub fn stack_id() -> StackId {
    StackId::new(STACK_ID)
}

pub fn state(status: &str) -> StackState {
    StackState::new(stack_id(), "web", status)
}

pub fn resource(logical_id: &str, resource_type: &str, status: &str) -> StackEvent {
    StackEvent::new(logical_id, resource_type, status)
}

/// Stack-level event, identified by the stack id as physical id.
pub fn stack_event(status: &str) -> StackEvent {
    StackEvent::new("web", "AWS::CloudFormation::Stack", status).with_physical_id(STACK_ID)
}

/// Counts of calls made against the service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub describe: usize,
    pub create: usize,
    pub update: usize,
    pub events: usize,
}

#[derive(Default)]
struct Script {
    describes: VecDeque<Result<StackState, RemoteError>>,
    submit: Option<Result<StackId, RemoteError>>,
    events: VecDeque<Vec<StackEvent>>,
    last_events: Vec<StackEvent>,
    requests: Vec<DeployRequest>,
    describe_args: Vec<String>,
    counts: CallCounts,
}

/// Service whose responses are queued up front.
///
/// Describe responses are consumed in order; the last one repeats once the
/// queue runs dry. Event pages work the same way.
#[derive(Default)]
pub struct ScriptedService {
    script: Mutex<Script>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn describe(self, response: Result<StackState, RemoteError>) -> Self {
        self.script.lock().describes.push_back(response);
        self
    }

    pub fn describe_missing(self) -> Self {
        self.describe(Err(RemoteError::validation(
            "Stack with id web does not exist",
        )))
    }

    pub fn submit(self, response: Result<StackId, RemoteError>) -> Self {
        self.script.lock().submit = Some(response);
        self
    }

    pub fn events(self, page: Vec<StackEvent>) -> Self {
        self.script.lock().events.push_back(page);
        self
    }

    pub fn counts(&self) -> CallCounts {
        self.script.lock().counts
    }

    pub fn requests(&self) -> Vec<DeployRequest> {
        self.script.lock().requests.clone()
    }

    pub fn describe_args(&self) -> Vec<String> {
        self.script.lock().describe_args.clone()
    }

    fn next_describe(script: &mut Script) -> Result<StackState, RemoteError> {
        match script.describes.len() {
            0 => Err(RemoteError::other("Unscripted", "no describe response queued")),
            1 => script.describes[0].clone(),
            _ => script
                .describes
                .pop_front()
                .unwrap_or_else(|| Err(RemoteError::other("Unscripted", "empty"))),
        }
    }

    fn submitted(script: &mut Script, request: &DeployRequest) -> Result<StackId, RemoteError> {
        script.requests.push(request.clone());
        script
            .submit
            .clone()
            .unwrap_or_else(|| Ok(stack_id()))
    }
}

#[async_trait]
impl StackService for ScriptedService {
    async fn describe_stack(&self, name_or_id: &str) -> Result<StackState, RemoteError> {
        let mut script = self.script.lock();
        script.counts.describe += 1;
        script.describe_args.push(name_or_id.to_string());
        Self::next_describe(&mut script)
    }

    async fn create_stack(&self, request: &DeployRequest) -> Result<StackId, RemoteError> {
        let mut script = self.script.lock();
        script.counts.create += 1;
        Self::submitted(&mut script, request)
    }

    async fn update_stack(&self, request: &DeployRequest) -> Result<StackId, RemoteError> {
        let mut script = self.script.lock();
        script.counts.update += 1;
        Self::submitted(&mut script, request)
    }

    async fn list_stack_events(&self, _stack_id: &StackId) -> Result<Vec<StackEvent>, RemoteError> {
        let mut script = self.script.lock();
        script.counts.events += 1;
        if let Some(page) = script.events.pop_front() {
            script.last_events = page;
        }
        Ok(script.last_events.clone())
    }
}
