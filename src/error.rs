// ABOUTME: Application-wide error types for stackpilot.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::deploy::DeployError;
use crate::pipeline::PluginError;
use crate::remote::RemoteError;
use crate::template::TemplateError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("hook failed: {0}")]
    Hook(String),

    #[error("interrupted")]
    Interrupted,

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("stack service error: {0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
