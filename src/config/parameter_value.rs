// ABOUTME: Parameter values with environment variable interpolation.
// ABOUTME: Handles literal scalars and references to environment variables.

use crate::error::{Error, Result};
use crate::parameters::{ParameterMap, ScalarValue};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Literal(ScalarValue),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<ScalarValue>,
    },
}

impl ParameterValue {
    pub fn resolve(&self) -> Result<ScalarValue> {
        match self {
            ParameterValue::Literal(v) => Ok(v.clone()),
            ParameterValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(ScalarValue::Text(val)),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

pub fn resolve_parameters(entries: &[(String, ParameterValue)]) -> Result<ParameterMap> {
    let mut map = ParameterMap::new();
    for (key, value) in entries {
        map.insert(key.clone(), value.resolve()?);
    }
    Ok(map)
}
