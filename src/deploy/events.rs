// ABOUTME: Event log tracking for the operation under observation.
// ABOUTME: Truncates history at the operation start, reports failures, and dedups resource progress.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::DeployError;
use crate::output::{ProgressEvent, ProgressSink};
use crate::remote::{StackEvent, StackService};
use crate::status::StackStatus;
use crate::types::StackId;

/// What is happening to a resource, derived from its status prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceAction {
    Creating,
    Updating,
    Deleting,
}

impl ResourceAction {
    pub fn classify(status: &StackStatus) -> Option<Self> {
        let status = status.as_str();
        if status.starts_with("CREATE") {
            Some(ResourceAction::Creating)
        } else if status.starts_with("UPDATE") {
            Some(ResourceAction::Updating)
        } else if status.starts_with("DELETE") {
            Some(ResourceAction::Deleting)
        } else {
            None
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceAction::Creating => write!(f, "creating"),
            ResourceAction::Updating => write!(f, "updating"),
            ResourceAction::Deleting => write!(f, "deleting"),
        }
    }
}

/// Keep only events newer than the start of the current operation, oldest first.
///
/// `events` is newest-first as returned by the service. The anchor is the newest
/// stack-level CREATE_IN_PROGRESS or UPDATE_IN_PROGRESS event; it is excluded.
/// Without an anchor every event is kept.
pub fn operation_window(mut events: Vec<StackEvent>, stack_id: &StackId) -> Vec<StackEvent> {
    if let Some(anchor) = events
        .iter()
        .position(|e| e.is_stack_event(stack_id) && e.resource_status.is_operation_start())
    {
        events.truncate(anchor);
    }
    events.reverse();
    events
}

/// Fetch the events of the current operation in chronological order.
pub async fn retrieve_stack_events<S>(
    service: &S,
    stack_id: &StackId,
) -> Result<Vec<StackEvent>, DeployError>
where
    S: StackService + ?Sized,
{
    let events = service.list_stack_events(stack_id).await?;
    tracing::debug!(stack_id = %stack_id, total = events.len(), "fetched stack events");
    Ok(operation_window(events, stack_id))
}

/// Emit one failure line per failed resource. Returns how many were emitted.
pub fn log_failures(events: &[StackEvent], sink: &dyn ProgressSink) -> usize {
    let mut emitted = 0;
    for event in events.iter().filter(|e| e.resource_status.is_failed()) {
        sink.emit(ProgressEvent::ResourceFailed {
            logical_id: event.logical_resource_id.clone(),
            resource_type: event.resource_type.clone(),
            status: event.resource_status.to_string(),
            reason: event
                .resource_status_reason
                .clone()
                .unwrap_or_else(|| event.resource_status.to_string()),
        });
        emitted += 1;
    }
    emitted
}

/// Per-loop record of which resources have already been reported.
#[derive(Debug)]
pub struct EventTracker {
    stack_id: StackId,
    reported: HashSet<String>,
}

impl EventTracker {
    pub fn new(stack_id: StackId) -> Self {
        Self {
            stack_id,
            reported: HashSet::new(),
        }
    }

    /// Emit a progress line for each resource seen for the first time.
    /// Returns how many lines were emitted.
    pub fn report_progress(&mut self, events: &[StackEvent], sink: &dyn ProgressSink) -> usize {
        let mut emitted = 0;
        for event in events {
            if event.logical_resource_id.is_empty()
                || event.is_stack_event(&self.stack_id)
                || self.reported.contains(&event.logical_resource_id)
            {
                continue;
            }

            let Some(action) = ResourceAction::classify(&event.resource_status) else {
                continue;
            };

            sink.emit(ProgressEvent::Resource {
                action,
                logical_id: event.logical_resource_id.clone(),
                resource_type: event.resource_type.clone(),
            });
            self.reported.insert(event.logical_resource_id.clone());
            emitted += 1;
        }
        emitted
    }

    #[cfg(test)]
    fn has_reported(&self, logical_id: &str) -> bool {
        self.reported.contains(logical_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;

    const STACK: &str = "arn:stack/web/1";

    fn stack_id() -> StackId {
        StackId::new(STACK)
    }

    fn stack_event(status: &str) -> StackEvent {
        StackEvent::new("web", "AWS::CloudFormation::Stack", status).with_physical_id(STACK)
    }

    #[test]
    fn classify_by_prefix() {
        let classify = |s: &str| ResourceAction::classify(&StackStatus::new(s));
        assert_eq!(classify("CREATE_IN_PROGRESS"), Some(ResourceAction::Creating));
        assert_eq!(classify("UPDATE_COMPLETE"), Some(ResourceAction::Updating));
        assert_eq!(classify("DELETE_FAILED"), Some(ResourceAction::Deleting));
        assert_eq!(classify("IMPORT_IN_PROGRESS"), None);
    }

    #[test]
    fn window_without_anchor_keeps_everything() {
        let events = vec![
            StackEvent::new("B", "T", "CREATE_COMPLETE"),
            StackEvent::new("A", "T", "CREATE_COMPLETE"),
        ];
        let window = operation_window(events, &stack_id());
        let ids: Vec<_> = window.iter().map(|e| e.logical_resource_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn window_uses_newest_anchor() {
        // newest first
        let events = vec![
            StackEvent::new("New", "T", "UPDATE_IN_PROGRESS"),
            stack_event("UPDATE_IN_PROGRESS"),
            StackEvent::new("Old", "T", "CREATE_COMPLETE"),
            stack_event("CREATE_IN_PROGRESS"),
        ];
        let window = operation_window(events, &stack_id());
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].logical_resource_id, "New");
    }

    #[test]
    fn failures_fall_back_to_status() {
        let sink = MemorySink::new();
        let events = vec![
            StackEvent::new("Queue", "AWS::SQS::Queue", "CREATE_FAILED"),
            StackEvent::new("Bucket", "AWS::S3::Bucket", "CREATE_COMPLETE"),
            StackEvent::new("Topic", "AWS::SNS::Topic", "CREATE_FAILED").with_reason("Access denied"),
        ];

        assert_eq!(log_failures(&events, &sink), 2);
        assert_eq!(
            sink.lines(),
            vec![
                "  ✗ Queue (AWS::SQS::Queue) CREATE_FAILED: CREATE_FAILED",
                "  ✗ Topic (AWS::SNS::Topic) CREATE_FAILED: Access denied",
            ]
        );
    }

    #[test]
    fn tracker_skips_stack_level_and_unnamed_events() {
        let sink = MemorySink::new();
        let mut tracker = EventTracker::new(stack_id());
        let events = vec![
            stack_event("UPDATE_COMPLETE_CLEANUP_IN_PROGRESS"),
            StackEvent::new("", "T", "CREATE_IN_PROGRESS"),
            StackEvent::new("Bucket", "AWS::S3::Bucket", "DELETE_IN_PROGRESS"),
        ];

        assert_eq!(tracker.report_progress(&events, &sink), 1);
        assert_eq!(sink.lines(), vec!["  deleting Bucket (AWS::S3::Bucket)"]);
        assert!(tracker.has_reported("Bucket"));
        assert!(!tracker.has_reported("web"));
    }

    #[test]
    fn tracker_reports_each_resource_once() {
        let sink = MemorySink::new();
        let mut tracker = EventTracker::new(stack_id());
        let first = vec![StackEvent::new("Bucket", "AWS::S3::Bucket", "CREATE_IN_PROGRESS")];
        let second = vec![
            StackEvent::new("Bucket", "AWS::S3::Bucket", "CREATE_IN_PROGRESS"),
            StackEvent::new("Bucket", "AWS::S3::Bucket", "CREATE_COMPLETE"),
        ];

        assert_eq!(tracker.report_progress(&first, &sink), 1);
        assert_eq!(tracker.report_progress(&second, &sink), 0);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn unclassified_status_is_not_recorded() {
        let sink = MemorySink::new();
        let mut tracker = EventTracker::new(stack_id());
        tracker.report_progress(&[StackEvent::new("Table", "T", "IMPORT_IN_PROGRESS")], &sink);
        assert!(!tracker.has_reported("Table"));

        tracker.report_progress(&[StackEvent::new("Table", "T", "UPDATE_IN_PROGRESS")], &sink);
        assert_eq!(sink.lines(), vec!["  updating Table (T)"]);
    }
}
