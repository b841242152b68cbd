// ABOUTME: Project scripts run at points of a stack deployment.
// ABOUTME: Each stage hands its script what is known about the stack at that point.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::deploy::Outcome;
use crate::status::StackStatus;
use crate::types::{StackId, StackName};

/// Scripts live here, relative to the project directory.
pub const HOOKS_DIR: &str = ".stackpilot/hooks";

/// Prefix of the per-output variables given to `post-deploy`.
pub const OUTPUT_VAR_PREFIX: &str = "STACKPILOT_OUTPUT_";

/// The deployment a script runs for.
#[derive(Debug, Clone)]
pub struct DeployTarget {
    pub stack: StackName,
    pub region: String,
    pub template: PathBuf,
}

/// A point in a deployment where a project script may run.
#[derive(Debug, Clone, Copy)]
pub enum Stage<'a> {
    /// Nothing has been sent to the service yet.
    PreDeploy,
    /// The stack settled in a successful state.
    PostDeploy {
        outcome: &'a Outcome,
        /// Where the outputs artifact was written, when one was requested.
        outputs_file: Option<&'a Path>,
    },
    /// The deployment failed or was interrupted.
    OnError {
        error: &'a str,
        stack_id: Option<&'a StackId>,
        status: Option<&'a StackStatus>,
    },
}

impl Stage<'_> {
    pub fn script_name(&self) -> &'static str {
        match self {
            Stage::PreDeploy => "pre-deploy",
            Stage::PostDeploy { .. } => "post-deploy",
            Stage::OnError { .. } => "on-error",
        }
    }

    /// A failing script at this stage stops the deployment before it starts.
    pub fn aborts_deployment(&self) -> bool {
        matches!(self, Stage::PreDeploy)
    }

    /// Variables describing the target and whatever this stage has learned.
    pub fn environment(&self, target: &DeployTarget) -> Vec<(String, String)> {
        let mut env = vec![
            var("STACK", target.stack.as_str()),
            var("REGION", &target.region),
            var("TEMPLATE", &target.template.display().to_string()),
        ];

        match self {
            Stage::PreDeploy => {}
            Stage::PostDeploy {
                outcome,
                outputs_file,
            } => {
                env.push(var("STACK_ID", outcome.stack_id.as_str()));
                env.push(var("STATUS", outcome.status.as_str()));
                if let Some(path) = outputs_file {
                    env.push(var("OUTPUTS_FILE", &path.display().to_string()));
                }
                for (key, value) in outcome.simplified_outputs.iter() {
                    env.push((format!("{OUTPUT_VAR_PREFIX}{key}"), value.to_string()));
                }
            }
            Stage::OnError {
                error,
                stack_id,
                status,
            } => {
                env.push(var("ERROR", error));
                if let Some(id) = stack_id {
                    env.push(var("STACK_ID", id.as_str()));
                }
                if let Some(status) = status {
                    env.push(var("STATUS", status.as_str()));
                }
            }
        }
        env
    }

    /// Bytes fed to the script's stdin: the outputs as JSON after a deploy.
    fn input(&self) -> Option<Vec<u8>> {
        match self {
            Stage::PostDeploy { outcome, .. } => serde_json::to_vec(&outcome.simplified_outputs).ok(),
            _ => None,
        }
    }
}

fn var(name: &str, value: &str) -> (String, String) {
    (format!("STACKPILOT_{name}"), value.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("could not run {}: {source}", .script.display())]
    Spawn {
        script: PathBuf,
        source: std::io::Error,
    },
}

/// A finished script.
#[derive(Debug)]
pub struct HookRun {
    pub script: PathBuf,
    /// None when the script was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl HookRun {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The hook scripts of one project.
#[derive(Debug, Clone)]
pub struct Hooks {
    project_dir: PathBuf,
}

impl Hooks {
    pub fn in_project(project_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
        }
    }

    /// Path of the script for `stage`, if the project has one.
    pub fn script(&self, stage: &Stage<'_>) -> Option<PathBuf> {
        let path = self.project_dir.join(HOOKS_DIR).join(stage.script_name());
        path.is_file().then_some(path)
    }

    /// Run the stage's script from the project directory.
    ///
    /// Returns `Ok(None)` when the project has no script for this stage.
    pub async fn run(
        &self,
        stage: Stage<'_>,
        target: &DeployTarget,
    ) -> Result<Option<HookRun>, HookError> {
        let Some(script) = self.script(&stage) else {
            return Ok(None);
        };
        let input = stage.input();

        tracing::info!(stage = stage.script_name(), script = %script.display(), "running hook");

        let spawn_error = |source| HookError::Spawn {
            script: script.clone(),
            source,
        };

        let mut child = Command::new(&script)
            .current_dir(&self.project_dir)
            .envs(stage.environment(target))
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        // Written from a task so a script that fills its stdout first can't stall us.
        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&input).await {
                    tracing::debug!("hook did not read its input: {}", e);
                }
            });
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        let run = HookRun {
            script,
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if run.succeeded() {
            tracing::debug!(stage = stage.script_name(), "hook finished");
        } else {
            tracing::warn!(
                stage = stage.script_name(),
                exit_code = ?run.exit_code,
                "hook failed"
            );
        }
        Ok(Some(run))
    }
}
