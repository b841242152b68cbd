// ABOUTME: Submission payload for create and update operations.
// ABOUTME: Applies the create-only failure default, then caller options, then parameters and body.

use serde::Serialize;
use std::fmt;

use crate::config::{OnFailure, StackOptions};
use crate::parameters::Parameter;
use crate::types::StackName;

/// Whether the stack is being created or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Update,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => write!(f, "create"),
            OperationKind::Update => write!(f, "update"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// The request sent to the service for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployRequest {
    #[serde(skip)]
    pub kind: OperationKind,

    pub stack_name: StackName,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<OnFailure>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_rollback: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(rename = "RoleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_in_minutes: Option<u32>,

    #[serde(rename = "NotificationARNs", skip_serializing_if = "Vec::is_empty")]
    pub notification_arns: Vec<String>,

    pub parameters: Vec<Parameter>,

    pub template_body: String,
}

impl DeployRequest {
    /// Build the payload.
    ///
    /// A failed creation defaults to deleting the stack so it never lingers in a
    /// state that needs manual cleanup. Updates get no default; the service keeps
    /// the previous good state.
    pub fn build(
        kind: OperationKind,
        stack_name: StackName,
        options: &StackOptions,
        parameters: Vec<Parameter>,
        template_body: String,
    ) -> Self {
        let on_failure = match kind {
            OperationKind::Create => options.on_failure.or(Some(OnFailure::Delete)),
            OperationKind::Update => options.on_failure,
        };

        DeployRequest {
            kind,
            stack_name,
            on_failure,
            disable_rollback: options.disable_rollback,
            capabilities: options.capabilities.clone(),
            tags: options
                .tags
                .iter()
                .map(|(k, v)| Tag {
                    key: k.clone(),
                    value: v.clone(),
                })
                .collect(),
            role_arn: options.role_arn.clone(),
            timeout_in_minutes: options.timeout_in_minutes,
            notification_arns: options.notification_arns.clone(),
            parameters,
            template_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name() -> StackName {
        StackName::new("web").unwrap()
    }

    #[test]
    fn create_defaults_to_delete_on_failure() {
        let request = DeployRequest::build(
            OperationKind::Create,
            name(),
            &StackOptions::default(),
            vec![],
            "{}".to_string(),
        );
        assert_eq!(request.on_failure, Some(OnFailure::Delete));
    }

    #[test]
    fn caller_overrides_failure_default() {
        let options = StackOptions {
            on_failure: Some(OnFailure::DoNothing),
            ..Default::default()
        };
        let request =
            DeployRequest::build(OperationKind::Create, name(), &options, vec![], String::new());
        assert_eq!(request.on_failure, Some(OnFailure::DoNothing));
    }

    #[test]
    fn update_has_no_failure_default() {
        let request = DeployRequest::build(
            OperationKind::Update,
            name(),
            &StackOptions::default(),
            vec![],
            String::new(),
        );
        assert_eq!(request.on_failure, None);
    }

    #[test]
    fn parameters_and_body_come_from_arguments() {
        let options = StackOptions {
            parameters: Some(vec![Parameter::new("Stale", "x")]),
            ..Default::default()
        };
        let merged = vec![Parameter::new("Stale", "x"), Parameter::new("Env", "prod")];
        let request = DeployRequest::build(
            OperationKind::Update,
            name(),
            &options,
            merged.clone(),
            "Resources: {}".to_string(),
        );
        assert_eq!(request.parameters, merged);
        assert_eq!(request.template_body, "Resources: {}");
    }

    #[test]
    fn serializes_in_service_format() {
        let mut options = StackOptions::default();
        options.capabilities = vec!["CAPABILITY_IAM".to_string()];
        options.tags.insert("team".to_string(), "infra".to_string());
        options.role_arn = Some("arn:role".to_string());

        let request = DeployRequest::build(
            OperationKind::Create,
            name(),
            &options,
            vec![Parameter::new("Env", "prod")],
            "{}".to_string(),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "StackName": "web",
                "OnFailure": "DELETE",
                "Capabilities": ["CAPABILITY_IAM"],
                "Tags": [{"Key": "team", "Value": "infra"}],
                "RoleARN": "arn:role",
                "Parameters": [{"ParameterKey": "Env", "ParameterValue": "prod"}],
                "TemplateBody": "{}"
            })
        );
    }
}
