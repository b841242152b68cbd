// ABOUTME: Deployment orchestration: decide create vs update, submit, and wait.
// ABOUTME: Handles prior in-progress operations and the no-op update case.

use super::events::{log_failures, retrieve_stack_events};
use super::outcome::Outcome;
use super::poll::WaitOptions;
use super::request::{DeployRequest, OperationKind};
use super::DeployError;
use crate::config::{PollConfig, ServiceConfig, StackOptions};
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::ProgressSink;
use crate::parameters::{ParameterMap, duplicate_keys, merge_parameters};
use crate::remote::{StackService, StackState};
use crate::template::TemplateSource;
use crate::types::StackName;

/// Drives one stack through a deployment against a stack service.
pub struct Deployer<'a, S: ?Sized> {
    pub(super) service: &'a S,
    pub(super) service_config: &'a ServiceConfig,
    pub(super) poll: &'a PollConfig,
    pub(super) sink: &'a dyn ProgressSink,
}

impl<'a, S> Deployer<'a, S>
where
    S: StackService + ?Sized,
{
    pub fn new(
        service: &'a S,
        service_config: &'a ServiceConfig,
        poll: &'a PollConfig,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            service,
            service_config,
            poll,
            sink,
        }
    }

    /// Deploy a template as a stack and wait for the outcome.
    ///
    /// Any operation already running on the stack is waited out first.
    /// An update with nothing to change completes immediately with the
    /// existing stack state.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` / `InvalidStackName` before any remote call
    /// - `Remote` when a service call fails
    /// - `DeploymentFailed` when the stack settles in a non-successful status
    /// - `Timeout` when polling exceeds the configured limit
    pub async fn deploy(
        &self,
        options: &StackOptions,
        parameters: &ParameterMap,
        template: &TemplateSource,
        diagnostics: &mut Diagnostics,
    ) -> Result<Outcome, DeployError> {
        let template_body = template.body()?;
        let stack_name = match &options.name {
            Some(name) => name.clone(),
            None => template.default_stack_name()?,
        };

        let mut existing = self.find_existing(&stack_name).await?;

        if let Some(busy) = existing.take_if(|s| s.stack_status.is_in_progress()) {
            tracing::info!(
                stack = %stack_name,
                status = %busy.stack_status,
                "waiting for previous operation to finish"
            );
            let settled = self
                .await_completion(&busy.stack_id, WaitOptions::PRIOR_OPERATION)
                .await?;
            existing = (!settled.stack_status.is_deleted()).then_some(settled);
        }

        let kind = if existing.is_some() {
            OperationKind::Update
        } else {
            OperationKind::Create
        };

        let merged = merge_parameters(options.parameters.as_deref(), parameters);
        for key in duplicate_keys(&merged) {
            diagnostics.warn(Warning::duplicate_parameter(&key));
        }

        let request = DeployRequest::build(kind, stack_name.clone(), options, merged, template_body);
        tracing::info!(stack = %stack_name, operation = %kind, "submitting stack operation");

        let submitted = match kind {
            OperationKind::Create => self.service.create_stack(&request).await,
            OperationKind::Update => self.service.update_stack(&request).await,
        };

        let state = match (submitted, existing) {
            (Ok(stack_id), _) => {
                self.await_completion(&stack_id, WaitOptions::NEW_OPERATION)
                    .await?
            }
            (Err(e), Some(current)) if e.is_no_updates() => {
                tracing::info!(stack = %stack_name, "no updates to perform");
                current
            }
            (Err(e), _) => return Err(e.into()),
        };

        self.finish(&stack_name, state, diagnostics).await
    }

    async fn find_existing(&self, stack_name: &StackName) -> Result<Option<StackState>, DeployError> {
        match self.service.describe_stack(stack_name.as_str()).await {
            Ok(state) if state.stack_status.is_deleted() => Ok(None),
            Ok(state) => Ok(Some(state)),
            Err(e) if e.is_stack_missing() => {
                tracing::debug!(stack = %stack_name, "stack does not exist yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn finish(
        &self,
        stack_name: &StackName,
        state: StackState,
        diagnostics: &mut Diagnostics,
    ) -> Result<Outcome, DeployError> {
        let outcome = Outcome::from_state(&state);

        if !outcome.success {
            if state.stack_status.is_failed() {
                match retrieve_stack_events(self.service, &state.stack_id).await {
                    Ok(events) => {
                        log_failures(&events, self.sink);
                    }
                    Err(e) => tracing::warn!(stack = %stack_name, "could not fetch failure events: {}", e),
                }
            }
            return Err(DeployError::DeploymentFailed {
                stack: stack_name.to_string(),
                stack_id: state.stack_id,
                status: state.stack_status,
                reason: state.stack_status_reason,
            });
        }

        if state.stack_status.is_cleanup_in_progress() {
            diagnostics.warn(Warning::cleanup_pending(stack_name.as_str()));
        }

        tracing::info!(stack = %stack_name, status = %state.stack_status, "stack deployed");
        Ok(outcome)
    }
}
