// ABOUTME: User-facing pipeline error with SNAFU pattern.
// ABOUTME: Tags every failure with the component name for the surrounding build tool.

use snafu::Snafu;

use crate::deploy::{DeployError, DeployErrorKind};

/// Component tag attached to every pipeline error.
pub const PLUGIN_NAME: &str = "stackpilot";

/// Failure surfaced to the build pipeline.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PluginError {
    #[snafu(display("[{plugin}] {source}"))]
    Deploy {
        plugin: &'static str,
        source: DeployError,
    },

    #[snafu(display("[{plugin}] {message}"))]
    Message {
        plugin: &'static str,
        message: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginErrorKind {
    Deploy(DeployErrorKind),
    /// Failure outside the engine, such as encoding the result artifact.
    Message,
}

impl PluginError {
    pub fn message(message: impl Into<String>) -> Self {
        PluginError::Message {
            plugin: PLUGIN_NAME,
            message: message.into(),
        }
    }

    pub fn plugin(&self) -> &'static str {
        match self {
            PluginError::Deploy { plugin, .. } | PluginError::Message { plugin, .. } => plugin,
        }
    }

    pub fn kind(&self) -> PluginErrorKind {
        match self {
            PluginError::Deploy { source, .. } => PluginErrorKind::Deploy(source.kind()),
            PluginError::Message { .. } => PluginErrorKind::Message,
        }
    }

    /// The engine error underneath, if there is one.
    pub fn deploy_error(&self) -> Option<&DeployError> {
        match self {
            PluginError::Deploy { source, .. } => Some(source),
            PluginError::Message { .. } => None,
        }
    }
}

impl From<DeployError> for PluginError {
    fn from(source: DeployError) -> Self {
        PluginError::Deploy {
            plugin: PLUGIN_NAME,
            source,
        }
    }
}
