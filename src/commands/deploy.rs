// ABOUTME: Deploy command implementation.
// ABOUTME: Runs hooks around the engine, writes the result artifact, and prints outputs.

use super::connection::connect_service;
use stackpilot::config::Config;
use stackpilot::deploy::{DeployError, Deployer};
use stackpilot::diagnostics::{Diagnostics, Warning};
use stackpilot::error::{Error, Result};
use stackpilot::hooks::{DeployTarget, Hooks, Stage};
use stackpilot::output::Output;
use stackpilot::pipeline::{ResultArtifact, deploy_template};
use stackpilot::template::TemplateSource;
use stackpilot::types::StackName;
use std::env;
use std::path::{Path, PathBuf};

/// Command-line overrides for one deployment.
#[derive(Debug, Default)]
pub struct DeployArgs {
    pub template: Option<PathBuf>,
    pub stack: Option<String>,
    pub parameters: Vec<(String, String)>,
    pub outputs_dir: Option<PathBuf>,
}

pub async fn deploy(config: Config, args: DeployArgs, mut output: Output) -> Result<()> {
    output.start_timer();
    let cwd = env::current_dir()?;
    let hooks = Hooks::in_project(&cwd);
    let mut diag = Diagnostics::default();

    let template_path = match args.template {
        Some(path) => path,
        None => config.template_path()?.to_path_buf(),
    };

    let mut options = config.stack.clone();
    if let Some(name) = args.stack.as_deref() {
        options.name = Some(StackName::new(name).map_err(DeployError::from)?);
    }

    let mut parameters = config.resolve_parameters()?;
    for (key, value) in args.parameters {
        parameters.insert(key, value);
    }

    let template = TemplateSource::from_path(&template_path).await?;
    let stack_name = match &options.name {
        Some(name) => name.clone(),
        None => template.default_stack_name().map_err(DeployError::from)?,
    };

    let target = DeployTarget {
        stack: stack_name.clone(),
        region: config.service.region.clone(),
        template: template_path.clone(),
    };

    run_hook(&hooks, Stage::PreDeploy, &target, &mut diag).await?;

    let service = connect_service(&config)?;
    output.progress(&format!(
        "Deploying stack {} from {} ({})",
        stack_name,
        template_path.display(),
        config.service.region
    ));

    let deployer = Deployer::new(
        &service,
        config.service_settings(),
        config.poll_settings(),
        &output,
    );

    let result = tokio::select! {
        result = deploy_template(&deployer, &options, &parameters, &template, &mut diag) => {
            result.map_err(Error::from)
        }
        _ = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    };

    let (outcome, artifact) = match result {
        Ok(done) => done,
        Err(e) => {
            let message = e.to_string();
            let failure = engine_error(&e);
            let stage = Stage::OnError {
                error: &message,
                stack_id: failure.and_then(DeployError::stack_id),
                status: failure.and_then(DeployError::stack_status),
            };
            run_hook(&hooks, stage, &target, &mut diag).await?;
            report_warnings(&output, &diag);
            return Err(e);
        }
    };

    let outputs_file = match args.outputs_dir.as_deref() {
        Some(dir) => {
            let written = write_artifact(dir, &artifact).await?;
            output.progress(&format!("  → wrote outputs to {}", written.display()));
            Some(written)
        }
        None => None,
    };

    output.outputs(&outcome.simplified_outputs);

    let stage = Stage::PostDeploy {
        outcome: &outcome,
        outputs_file: outputs_file.as_deref(),
    };
    run_hook(&hooks, stage, &target, &mut diag).await?;

    report_warnings(&output, &diag);
    output.success(&format!("Stack {} deployed ({})", stack_name, outcome.status));
    Ok(())
}

/// Run a stage's script. Only a stage that aborts the deployment turns a
/// failing script into an error; the others leave a warning.
async fn run_hook(
    hooks: &Hooks,
    stage: Stage<'_>,
    target: &DeployTarget,
    diag: &mut Diagnostics,
) -> Result<()> {
    let name = stage.script_name();
    let run = match hooks.run(stage, target).await {
        Ok(Some(run)) => run,
        Ok(None) => return Ok(()),
        Err(e) if stage.aborts_deployment() => return Err(Error::Hook(e.to_string())),
        Err(e) => {
            diag.warn(Warning::hook_failed(e.to_string()));
            return Ok(());
        }
    };

    if run.succeeded() {
        return Ok(());
    }
    if !run.stderr.is_empty() {
        eprintln!("{}", run.stderr.trim_end());
    }
    if stage.aborts_deployment() {
        return Err(Error::Hook(format!("{name} hook failed")));
    }
    diag.warn(Warning::hook_failed(format!(
        "{name} hook failed with exit code {:?}",
        run.exit_code
    )));
    Ok(())
}

fn engine_error(error: &Error) -> Option<&DeployError> {
    match error {
        Error::Plugin(e) => e.deploy_error(),
        Error::Deploy(e) => Some(e),
        _ => None,
    }
}

async fn write_artifact(dir: &Path, artifact: &ResultArtifact) -> Result<PathBuf> {
    let file_name = artifact.file_name().ok_or_else(|| {
        Error::InvalidConfig(format!("cannot name artifact for {}", artifact.source_id))
    })?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, &artifact.contents).await?;
    Ok(path)
}

fn report_warnings(output: &Output, diag: &Diagnostics) {
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
}
