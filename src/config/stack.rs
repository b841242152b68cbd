// ABOUTME: Caller-supplied stack options.
// ABOUTME: Name, failure policy, capabilities, tags, and a structured parameter list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::parameters::Parameter;
use crate::types::StackName;

/// What the service does when stack creation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnFailure {
    #[serde(alias = "do_nothing")]
    DoNothing,
    #[serde(alias = "rollback")]
    Rollback,
    #[serde(alias = "delete")]
    Delete,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StackOptions {
    #[serde(default)]
    pub name: Option<StackName>,

    #[serde(default)]
    pub on_failure: Option<OnFailure>,

    #[serde(default)]
    pub disable_rollback: Option<bool>,

    #[serde(default)]
    pub capabilities: Vec<String>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub role_arn: Option<String>,

    #[serde(default)]
    pub timeout_in_minutes: Option<u32>,

    #[serde(default)]
    pub notification_arns: Vec<String>,

    #[serde(default)]
    pub parameters: Option<Vec<Parameter>>,
}
