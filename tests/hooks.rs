// ABOUTME: Integration tests for deployment stage scripts.
// ABOUTME: Runs real shell scripts and checks what each stage hands them.

use stackpilot::deploy::Outcome;
use stackpilot::hooks::{DeployTarget, HookError, Hooks, Stage};
use stackpilot::remote::StackState;
use stackpilot::status::StackStatus;
use stackpilot::types::{StackId, StackName};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_script(project: &TempDir, name: &str, body: &str, mode: u32) {
    let dir = project.path().join(".stackpilot/hooks");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
}

fn target() -> DeployTarget {
    DeployTarget {
        stack: StackName::new("web").unwrap(),
        region: "eu-west-1".to_string(),
        template: PathBuf::from("templates/web.yml"),
    }
}

fn deployed() -> Outcome {
    Outcome::from_state(
        &StackState::new(StackId::new("arn:stack/web/7"), "web", "UPDATE_COMPLETE")
            .with_output("Url", "http://web.internal")
            .with_output("Bucket", "web-assets"),
    )
}

#[tokio::test]
async fn post_deploy_reads_outputs_from_env_and_stdin() {
    let project = TempDir::new().unwrap();
    write_script(
        &project,
        "post-deploy",
        r#"#!/bin/sh
echo "id=$STACKPILOT_STACK_ID status=$STACKPILOT_STATUS"
echo "url=$STACKPILOT_OUTPUT_Url file=$STACKPILOT_OUTPUTS_FILE"
cat
"#,
        0o755,
    );

    let outcome = deployed();
    let stage = Stage::PostDeploy {
        outcome: &outcome,
        outputs_file: Some(Path::new("out/web.json")),
    };
    let run = Hooks::in_project(project.path())
        .run(stage, &target())
        .await
        .unwrap()
        .unwrap();

    assert!(run.succeeded());
    let lines: Vec<_> = run.stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id=arn:stack/web/7 status=UPDATE_COMPLETE",
            "url=http://web.internal file=out/web.json",
            r#"{"Url":"http://web.internal","Bucket":"web-assets"}"#,
        ]
    );
}

#[tokio::test]
async fn on_error_sees_failed_stack() {
    let project = TempDir::new().unwrap();
    write_script(
        &project,
        "on-error",
        "#!/bin/sh\necho \"$STACKPILOT_STACK ${STACKPILOT_STACK_ID-none} $STACKPILOT_STATUS: $STACKPILOT_ERROR\"\n",
        0o755,
    );

    let id = StackId::new("arn:stack/web/7");
    let status = StackStatus::new("UPDATE_ROLLBACK_COMPLETE");
    let stage = Stage::OnError {
        error: "stack web finished with status UPDATE_ROLLBACK_COMPLETE",
        stack_id: Some(&id),
        status: Some(&status),
    };
    let run = Hooks::in_project(project.path())
        .run(stage, &target())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        run.stdout.trim_end(),
        "web arn:stack/web/7 UPDATE_ROLLBACK_COMPLETE: stack web finished with status UPDATE_ROLLBACK_COMPLETE"
    );
}

#[tokio::test]
async fn on_error_before_submission_leaves_id_unset() {
    let project = TempDir::new().unwrap();
    write_script(
        &project,
        "on-error",
        "#!/bin/sh\necho \"${STACKPILOT_STACK_ID-unset} ${STACKPILOT_STATUS-unset}\"\n",
        0o755,
    );

    let stage = Stage::OnError {
        error: "interrupted",
        stack_id: None,
        status: None,
    };
    let run = Hooks::in_project(project.path())
        .run(stage, &target())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(run.stdout.trim_end(), "unset unset");
}

#[tokio::test]
async fn scripts_run_from_the_project_directory() {
    let project = TempDir::new().unwrap();
    write_script(&project, "pre-deploy", "#!/bin/sh\npwd\n", 0o755);

    let run = Hooks::in_project(project.path())
        .run(Stage::PreDeploy, &target())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        Path::new(run.stdout.trim_end()).canonicalize().unwrap(),
        project.path().canonicalize().unwrap()
    );
}

#[tokio::test]
async fn failing_pre_deploy_reports_exit_code() {
    let project = TempDir::new().unwrap();
    write_script(
        &project,
        "pre-deploy",
        "#!/bin/sh\necho 'change freeze' >&2\nexit 4\n",
        0o755,
    );

    let run = Hooks::in_project(project.path())
        .run(Stage::PreDeploy, &target())
        .await
        .unwrap()
        .unwrap();

    assert!(!run.succeeded());
    assert_eq!(run.exit_code, Some(4));
    assert!(run.stderr.contains("change freeze"));
    assert!(Stage::PreDeploy.aborts_deployment());
}

#[tokio::test]
async fn non_executable_script_cannot_run() {
    let project = TempDir::new().unwrap();
    write_script(&project, "pre-deploy", "#!/bin/sh\nexit 0\n", 0o644);

    let err = Hooks::in_project(project.path())
        .run(Stage::PreDeploy, &target())
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::Spawn { .. }));
    assert!(err.to_string().contains("pre-deploy"));
}

#[tokio::test]
async fn stage_without_script_is_skipped() {
    let project = TempDir::new().unwrap();
    write_script(&project, "on-error", "#!/bin/sh\nexit 1\n", 0o755);

    let outcome = deployed();
    let stage = Stage::PostDeploy {
        outcome: &outcome,
        outputs_file: None,
    };
    let run = Hooks::in_project(project.path())
        .run(stage, &target())
        .await
        .unwrap();

    assert!(run.is_none());
}
