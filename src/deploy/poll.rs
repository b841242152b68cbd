// ABOUTME: Status polling with exponential backoff.
// ABOUTME: The only place the engine waits on time; bounded by the configured timeout.

use std::time::Duration;

use super::events::{EventTracker, log_failures, retrieve_stack_events};
use super::{DeployError, Deployer};
use crate::config::PollConfig;
use crate::output::ProgressEvent;
use crate::remote::{StackService, StackState};
use crate::types::StackId;

/// Doubling delay sequence with an upper bound.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            current: initial.min(max),
            max,
        }
    }

    pub fn from_config(config: &PollConfig) -> Self {
        Self::new(config.initial_delay, config.max_delay)
    }

    /// Delay to wait now; the following one doubles, up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self
            .current
            .checked_mul(2)
            .map_or(self.max, |next| next.min(self.max));
        delay
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}

/// How a wait treats progress reporting and trailing cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Report resource progress and failures for this operation.
    pub report_events: bool,
    /// Keep waiting while superseded resources are cleaned up.
    pub wait_for_cleanup: bool,
}

impl WaitOptions {
    /// Waiting out someone else's operation before starting ours.
    pub const PRIOR_OPERATION: Self = Self {
        report_events: false,
        wait_for_cleanup: true,
    };

    /// Following the operation we just submitted.
    pub const NEW_OPERATION: Self = Self {
        report_events: true,
        wait_for_cleanup: false,
    };
}

impl<S> Deployer<'_, S>
where
    S: StackService + ?Sized,
{
    /// Poll the stack until it settles.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Remote` if a describe or event call fails and
    /// `DeployError::Timeout` if the configured poll timeout elapses.
    pub async fn await_completion(
        &self,
        stack_id: &StackId,
        options: WaitOptions,
    ) -> Result<StackState, DeployError> {
        let wait = self.poll_until_settled(stack_id, options);
        match self.poll.timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| DeployError::Timeout {
                    stack: stack_id.to_string(),
                    after: limit,
                })?,
            None => wait.await,
        }
    }

    async fn poll_until_settled(
        &self,
        stack_id: &StackId,
        options: WaitOptions,
    ) -> Result<StackState, DeployError> {
        let mut backoff = Backoff::from_config(self.poll);
        let mut tracker = EventTracker::new(stack_id.clone());
        let mut failure_reported = false;

        loop {
            let state = self.service.describe_stack(stack_id.as_str()).await?;
            let status = &state.stack_status;
            let completed = !status.is_in_progress()
                || (!options.wait_for_cleanup && status.is_cleanup_in_progress());

            if options.report_events {
                let events = retrieve_stack_events(self.service, stack_id).await?;
                tracker.report_progress(&events, self.sink);

                if !failure_reported && status.indicates_failure() {
                    failure_reported = true;
                    log_failures(&events, self.sink);
                    self.sink.emit(ProgressEvent::ConsoleLink {
                        url: self.service_config.console_link(stack_id),
                    });
                }
            }

            let next_check = (!completed).then(|| backoff.next_delay());
            tracing::debug!(
                stack_id = %stack_id,
                status = %status,
                ?next_check,
                "polled stack status"
            );
            self.sink.emit(ProgressEvent::Status {
                stack: state.stack_name.clone(),
                status: status.to_string(),
                reason: state.stack_status_reason.clone(),
                next_check,
            });

            match next_check {
                None => return Ok(state),
                Some(delay) => tokio::time::sleep(delay).await,
            }
        }
    }
}
