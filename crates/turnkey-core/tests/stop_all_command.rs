//! Integration tests for stopping every running container.

mod support;

use turnkey_core::commands::{StopAllCommand, StopAllOptions};
use turnkey_core::deploy::{AssumeNo, ExecutionStatus};
use turnkey_core::tools::{Tool, ToolError};

use support::{FakeRunner, RecordingConfirm};

#[test]
fn stops_every_listed_container_in_one_step() {
    let runner = FakeRunner::with_tools([Tool::Docker]).respond("docker ps -q", 0, "3f1a\n9bc2\n\n", "");
    let confirm = RecordingConfirm::answering(true);

    let report = StopAllCommand::new(&runner)
        .execute(&StopAllOptions::new(), &confirm)
        .expect("stop-all");

    assert!(report.completed());
    assert_eq!(report.containers, vec!["3f1a", "9bc2"]);
    assert_eq!(
        runner.command_lines(),
        vec!["docker ps -q", "docker stop 3f1a 9bc2"]
    );
    assert_eq!(confirm.prompts(), vec!["Run 'docker stop 3f1a 9bc2'?"]);
}

#[test]
fn declining_leaves_containers_running() {
    let runner = FakeRunner::with_tools([Tool::Docker]).respond("docker ps -q", 0, "3f1a\n", "");

    let report = StopAllCommand::new(&runner)
        .execute(&StopAllOptions::new(), &AssumeNo)
        .expect("stop-all");

    assert_eq!(
        report.status,
        ExecutionStatus::Aborted {
            declined: "docker stop 3f1a".to_string()
        }
    );
    assert_eq!(runner.command_lines(), vec!["docker ps -q"]);
}

#[test]
fn assume_yes_skips_the_prompt() {
    let runner = FakeRunner::with_tools([Tool::Docker]).respond("docker ps -q", 0, "3f1a\n", "");
    let confirm = RecordingConfirm::answering(false);

    let report = StopAllCommand::new(&runner)
        .execute(&StopAllOptions::new().with_assume_yes(true), &confirm)
        .expect("stop-all");

    assert!(report.completed());
    assert!(confirm.prompts().is_empty());
    assert_eq!(report.steps.len(), 1);
}

#[test]
fn nothing_running_stops_nothing() {
    let runner = FakeRunner::with_tools([Tool::Docker]);
    let confirm = RecordingConfirm::answering(true);

    let report = StopAllCommand::new(&runner)
        .execute(&StopAllOptions::new(), &confirm)
        .expect("stop-all");

    assert!(report.completed());
    assert!(report.containers.is_empty());
    assert_eq!(runner.command_lines(), vec!["docker ps -q"]);
    assert!(confirm.prompts().is_empty());
}

#[test]
fn failing_listing_is_an_error() {
    let runner = FakeRunner::with_tools([Tool::Docker]).respond(
        "docker ps -q",
        1,
        "",
        "Cannot connect to the Docker daemon",
    );

    let err = StopAllCommand::new(&runner)
        .execute(&StopAllOptions::new().with_assume_yes(true), &AssumeNo)
        .expect_err("daemon down");
    assert!(matches!(
        err.downcast_ref::<ToolError>(),
        Some(ToolError::Failed { .. })
    ));
}

#[test]
fn missing_docker_is_reported() {
    let runner = FakeRunner::default();

    let err = StopAllCommand::new(&runner)
        .execute(&StopAllOptions::new(), &AssumeNo)
        .expect_err("docker missing");
    assert!(matches!(
        err.downcast_ref::<ToolError>(),
        Some(ToolError::Missing(Tool::Docker))
    ));
    assert!(runner.calls().is_empty());
}
