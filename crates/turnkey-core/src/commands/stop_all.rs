//! Stop every running Docker container on the host.
//!
//! Not limited to turnkey targets: anything `docker ps` lists is stopped.

use serde::Serialize;
use tracing::info;

use crate::deploy::{Confirm, ExecutionStatus, PlanStep, StepReport, execute_steps};
use crate::tools::{CommandRunner, Tool, ToolInvocation};

#[derive(Debug, Clone, Default)]
pub struct StopAllOptions {
    pub assume_yes: bool,
}

impl StopAllOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StopAllReport {
    /// IDs of the containers that were running
    pub containers: Vec<String>,
    pub status: ExecutionStatus,
    pub steps: Vec<StepReport>,
}

impl StopAllReport {
    pub fn completed(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }
}

pub struct StopAllCommand<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> StopAllCommand<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// List running containers with `docker ps -q`, then stop them all in one
    /// confirmed `docker stop` step.
    pub fn execute(
        &self,
        options: &StopAllOptions,
        confirm: &dyn Confirm,
    ) -> anyhow::Result<StopAllReport> {
        self.runner.locate(Tool::Docker)?;

        let list = ToolInvocation::for_tool(Tool::Docker).args(["ps", "-q"]);
        let output = self.runner.run(&list)?.into_result(&list)?;
        let containers: Vec<String> = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if containers.is_empty() {
            info!("No running containers");
            return Ok(StopAllReport {
                containers,
                status: ExecutionStatus::Completed,
                steps: Vec::new(),
            });
        }

        let stop = PlanStep::confirmed(
            ToolInvocation::for_tool(Tool::Docker)
                .arg("stop")
                .args(containers.iter().cloned()),
        );
        let execution = execute_steps(&[stop], self.runner, confirm, options.assume_yes)?;
        if execution.status == ExecutionStatus::Completed {
            info!(count = containers.len(), "Stopped all running containers");
        }

        Ok(StopAllReport {
            containers,
            status: execution.status,
            steps: execution.steps,
        })
    }
}
