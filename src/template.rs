// ABOUTME: Template source handed to the deployment engine.
// ABOUTME: Validates content is a concrete buffer and decodes it to the template body.

use bytes::Bytes;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::types::{StackName, StackNameError};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{0}' has no content buffer")]
    NoContent(String),

    #[error("unsupported template encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("template '{source_id}' is not valid {encoding}")]
    Decode {
        source_id: String,
        encoding: Encoding,
    },

    #[error("failed to read template {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Text encoding of the template content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl FromStr for Encoding {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ascii" => Ok(Encoding::Ascii),
            "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            other => Err(TemplateError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf8"),
            Encoding::Ascii => write!(f, "ascii"),
            Encoding::Latin1 => write!(f, "latin1"),
        }
    }
}

/// Template content as delivered by the build step.
#[derive(Debug, Clone)]
pub enum TemplateContent {
    Buffer(Bytes),
    /// Marker for a source entry that carries no data.
    Empty,
}

/// A template ready for deployment.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub source_id: String,
    pub content: TemplateContent,
    pub encoding: Encoding,
}

impl TemplateSource {
    pub fn new(source_id: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            source_id: source_id.into(),
            content: TemplateContent::Buffer(content.into()),
            encoding: Encoding::default(),
        }
    }

    /// Read a template file from disk.
    pub async fn from_path(path: &Path) -> Result<Self, TemplateError> {
        let data = tokio::fs::read(path).await.map_err(|e| TemplateError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(path.display().to_string(), data))
    }

    /// Decode the content into the template body sent to the service.
    pub fn body(&self) -> Result<String, TemplateError> {
        let TemplateContent::Buffer(data) = &self.content else {
            return Err(TemplateError::NoContent(self.source_id.clone()));
        };

        let decode_error = || TemplateError::Decode {
            source_id: self.source_id.clone(),
            encoding: self.encoding,
        };

        match self.encoding {
            Encoding::Utf8 => String::from_utf8(data.to_vec()).map_err(|_| decode_error()),
            Encoding::Ascii if data.is_ascii() => Ok(data.iter().map(|&b| b as char).collect()),
            Encoding::Ascii => Err(decode_error()),
            Encoding::Latin1 => Ok(data.iter().map(|&b| b as char).collect()),
        }
    }

    /// Stack name used when the caller does not choose one.
    pub fn default_stack_name(&self) -> Result<StackName, StackNameError> {
        StackName::from_source_id(&self.source_id)
    }
}
