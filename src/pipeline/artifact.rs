// ABOUTME: Result artifact emitted after a successful deployment.
// ABOUTME: Stack outputs as indented JSON, named after the template source.

use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::deploy::OutputMap;
use crate::template::TemplateSource;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultArtifact {
    /// Identity of the template this artifact was produced from.
    pub source_id: String,
    /// Source path with a `.json` extension.
    pub path: PathBuf,
    /// Two-space-indented UTF-8 JSON of `outputs`.
    pub contents: Bytes,
    pub outputs: OutputMap,
}

impl ResultArtifact {
    pub fn new(
        template: &TemplateSource,
        outputs: OutputMap,
    ) -> Result<Self, serde_json::Error> {
        let contents = serde_json::to_vec_pretty(&outputs)?;
        Ok(Self {
            source_id: template.source_id.clone(),
            path: Path::new(&template.source_id).with_extension("json"),
            contents: Bytes::from(contents),
            outputs,
        })
    }

    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }
}
