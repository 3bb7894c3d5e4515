//! Execute action plans step by step.

use serde::Serialize;
use tracing::{info, warn};

use super::confirm::Confirm;
use super::plan::{ActionPlan, PlanStep};
use crate::tools::{CommandRunner, ToolOutput};

/// Result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub command: String,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepReport {
    fn new(step: &PlanStep, output: ToolOutput) -> Self {
        Self {
            command: step.invocation.command_line(),
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// How plan execution ended when no step failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Completed,
    /// The operator declined a confirmation; later steps did not run.
    Aborted { declined: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub status: ExecutionStatus,
    pub steps: Vec<StepReport>,
}

/// Run every step of `plan` in order.
///
/// Steps flagged `requires_confirmation` ask `confirm` first unless
/// `assume_yes` is set. The first non-zero exit aborts the plan with
/// [`crate::tools::ToolError::Failed`].
pub fn execute_plan(
    plan: &ActionPlan,
    runner: &dyn CommandRunner,
    confirm: &dyn Confirm,
    assume_yes: bool,
) -> anyhow::Result<ExecutionReport> {
    execute_steps(&plan.steps, runner, confirm, assume_yes)
}

/// Run `plan_steps` in order, with the same rules as [`execute_plan`].
pub fn execute_steps(
    plan_steps: &[PlanStep],
    runner: &dyn CommandRunner,
    confirm: &dyn Confirm,
    assume_yes: bool,
) -> anyhow::Result<ExecutionReport> {
    let mut steps = Vec::with_capacity(plan_steps.len());

    for step in plan_steps {
        let command = step.invocation.command_line();

        if step.requires_confirmation && !assume_yes {
            let prompt = format!("Run '{command}'?");
            if !confirm.confirm(&prompt)? {
                info!(command = %command, "Step declined, stopping");
                return Ok(ExecutionReport {
                    status: ExecutionStatus::Aborted { declined: command },
                    steps,
                });
            }
        }

        info!(command = %command, "Running step");
        let output = runner.run(&step.invocation)?;
        if !output.success() {
            warn!(command = %command, code = ?output.code, "Step failed");
        }
        let output = output.into_result(&step.invocation)?;
        info!(command = %command, "Step completed");
        steps.push(StepReport::new(step, output));
    }

    Ok(ExecutionReport {
        status: ExecutionStatus::Completed,
        steps,
    })
}
