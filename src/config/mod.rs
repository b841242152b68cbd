// ABOUTME: Configuration types and parsing for stackpilot.yml.
// ABOUTME: Handles YAML parsing, parameter interpolation, and destination merging.

mod deserialize;
mod parameter_value;
mod poll;
mod service;
mod stack;

pub use parameter_value::{ParameterValue, resolve_parameters};
pub use poll::PollConfig;
pub use service::{DEFAULT_CONSOLE_URL, ServiceConfig};
pub use stack::{OnFailure, StackOptions};

use crate::error::{Error, Result};
use crate::parameters::ParameterMap;
use crate::types::StackName;
use deserialize::{deserialize_ordered_map, upsert};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "stackpilot.yml";
pub const CONFIG_FILENAME_ALT: &str = "stackpilot.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".stackpilot/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub stack: StackOptions,

    #[serde(default)]
    pub template: Option<PathBuf>,

    #[serde(default, deserialize_with = "deserialize_ordered_map")]
    pub parameters: Vec<(String, ParameterValue)>,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Destination {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub stack_name: Option<StackName>,

    #[serde(default, deserialize_with = "deserialize_ordered_map")]
    pub parameters: Vec<(String, ParameterValue)>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref region) = dest.region {
            merged.service.region = region.clone();
        }

        if dest.endpoint.is_some() {
            merged.service.endpoint = dest.endpoint.clone();
        }

        if dest.stack_name.is_some() {
            merged.stack.name = dest.stack_name.clone();
        }

        // Destination values replace same-named entries in place; new keys go last
        for (k, v) in &dest.parameters {
            upsert(&mut merged.parameters, k.clone(), v.clone());
        }

        Ok(merged)
    }

    /// Resolve the flat parameter map, reading environment references.
    pub fn resolve_parameters(&self) -> Result<ParameterMap> {
        resolve_parameters(&self.parameters)
    }

    pub fn poll_settings(&self) -> &PollConfig {
        &self.poll
    }

    pub fn service_settings(&self) -> &ServiceConfig {
        &self.service
    }

    /// Template path from the config file.
    pub fn template_path(&self) -> Result<&Path> {
        self.template
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig("template path is required".to_string()))
    }

    /// Configured stack name, else the template file stem.
    pub fn stack_name(&self) -> Result<StackName> {
        if let Some(name) = &self.stack.name {
            return Ok(name.clone());
        }
        let template = self.template_path()?;
        StackName::from_source_id(&template.display().to_string())
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Endpoint of the stack service, required for any remote command.
    pub fn endpoint(&self) -> Result<&str> {
        self.service
            .endpoint
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig("service.endpoint is required".to_string()))
    }

    /// Starter config written by `init`.
    pub fn starter() -> Self {
        Config {
            service: ServiceConfig {
                endpoint: Some("http://localhost:4566".to_string()),
                ..Default::default()
            },
            stack: StackOptions {
                name: StackName::new("my-stack").ok(),
                ..Default::default()
            },
            template: Some(PathBuf::from("template.yml")),
            parameters: Vec::new(),
            poll: PollConfig::default(),
            destinations: HashMap::new(),
        }
    }
}

pub fn init_config(
    dir: &Path,
    stack: Option<&str>,
    template: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::starter();

    if let Some(s) = stack {
        config.stack.name =
            Some(StackName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?);
    }

    if let Some(t) = template {
        config.template = Some(PathBuf::from(t));
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"service:
  region: {}
  endpoint: {}
stack:
  name: {}
template: {}
parameters: {{}}
poll:
  initial_delay: 2s
  max_delay: 15s
"#,
        config.service.region,
        config.service.endpoint.as_deref().unwrap_or("http://localhost:4566"),
        config.stack.name.as_ref().map(|n| n.as_str()).unwrap_or("my-stack"),
        config
            .template
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "template.yml".to_string()),
    )
}
