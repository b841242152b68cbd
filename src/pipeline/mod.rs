// ABOUTME: Build-pipeline entry point around the deployment engine.
// ABOUTME: Deploys one template and turns the outcome into a result artifact.

mod artifact;
mod error;

pub use artifact::ResultArtifact;
pub use error::{PLUGIN_NAME, PluginError, PluginErrorKind};

use crate::config::StackOptions;
use crate::deploy::{Deployer, Outcome};
use crate::diagnostics::Diagnostics;
use crate::parameters::ParameterMap;
use crate::remote::StackService;
use crate::template::TemplateSource;

/// Deploy one template and produce the artifact that replaces it downstream.
pub async fn deploy_template<S>(
    deployer: &Deployer<'_, S>,
    options: &StackOptions,
    parameters: &ParameterMap,
    template: &TemplateSource,
    diagnostics: &mut Diagnostics,
) -> Result<(Outcome, ResultArtifact), PluginError>
where
    S: StackService + ?Sized,
{
    let outcome = deployer
        .deploy(options, parameters, template, diagnostics)
        .await?;

    let artifact = ResultArtifact::new(template, outcome.simplified_outputs.clone())
        .map_err(|e| PluginError::message(format!("failed to encode stack outputs: {e}")))?;

    tracing::debug!(
        source = %template.source_id,
        artifact = %artifact.path.display(),
        "produced result artifact"
    );
    Ok((outcome, artifact))
}
