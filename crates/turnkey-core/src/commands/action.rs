//! Deploy, stop and check commands.

use serde::Serialize;
use tracing::info;

use crate::context::AppContext;
use crate::deploy::{
    Action, Confirm, ExecutionStatus, StepReport, execute_plan, plan_action,
};
use crate::scaffold::ScaffoldOutcome;
use crate::targets::Target;
use crate::tools::CommandRunner;
use crate::types::TargetKind;

use super::scaffold::scaffold_target;

/// Options for an action on one target
#[derive(Debug, Clone)]
pub struct ActionOptions {
    pub action: Action,
    pub kind: TargetKind,
    pub name: String,
    /// Skip every confirmation prompt
    pub assume_yes: bool,
    /// Ask before proceeding when deploy generated new settings files
    pub review: bool,
}

impl ActionOptions {
    pub fn new(action: Action, kind: TargetKind, name: impl Into<String>) -> Self {
        Self {
            action,
            kind,
            name: name.into(),
            assume_yes: false,
            review: true,
        }
    }

    pub fn deploy(kind: TargetKind, name: impl Into<String>) -> Self {
        Self::new(Action::Deploy, kind, name)
    }

    pub fn stop(kind: TargetKind, name: impl Into<String>) -> Self {
        Self::new(Action::Stop, kind, name)
    }

    pub fn check(kind: TargetKind, name: impl Into<String>) -> Self {
        Self::new(Action::Check, kind, name)
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn with_review(mut self, review: bool) -> Self {
        self.review = review;
        self
    }
}

/// Report from an action
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub action: Action,
    pub target: Target,
    /// Scaffolding done before a deploy; empty for other actions
    pub scaffolded: Vec<ScaffoldOutcome>,
    pub status: ExecutionStatus,
    pub steps: Vec<StepReport>,
}

impl ActionReport {
    pub fn completed(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }
}

pub struct ActionCommand<'a> {
    ctx: &'a AppContext,
    runner: &'a dyn CommandRunner,
}

impl<'a> ActionCommand<'a> {
    pub fn new(ctx: &'a AppContext, runner: &'a dyn CommandRunner) -> Self {
        Self { ctx, runner }
    }

    /// Resolve the target, check its tool, scaffold (deploy only), then run
    /// the plan.
    pub fn execute(
        &self,
        options: &ActionOptions,
        confirm: &dyn Confirm,
    ) -> anyhow::Result<ActionReport> {
        let target = self.ctx.catalog().resolve(options.kind, &options.name)?;
        let tool_path = self.runner.locate(options.kind.tool())?;
        info!(
            action = %options.action,
            kind = %target.kind,
            name = %target.name,
            tool = %tool_path.display(),
            "Starting action"
        );

        let scaffolded = if options.action == Action::Deploy {
            scaffold_target(self.ctx, &target)?
        } else {
            Vec::new()
        };

        let written: Vec<_> = scaffolded.iter().filter_map(|o| o.written()).collect();
        if !written.is_empty() && options.review && !options.assume_yes {
            let files = written
                .iter()
                .map(|w| w.path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let prompt = format!(
                "Generated {files} with placeholder values. Continue deploying '{}'?",
                target.name
            );
            if !confirm.confirm(&prompt)? {
                info!(name = %target.name, "Deploy stopped for settings review");
                return Ok(ActionReport {
                    action: options.action,
                    target,
                    scaffolded,
                    status: ExecutionStatus::Aborted {
                        declined: "settings review".to_string(),
                    },
                    steps: Vec::new(),
                });
            }
        }

        let family = self.ctx.family_for(target.kind)?;
        let plan = plan_action(options.action, &target, family.as_ref())?;
        let execution = execute_plan(&plan, self.runner, confirm, options.assume_yes)?;

        if execution.status == ExecutionStatus::Completed {
            info!(action = %options.action, name = %target.name, "Action completed");
        }

        Ok(ActionReport {
            action: options.action,
            target,
            scaffolded,
            status: execution.status,
            steps: execution.steps,
        })
    }
}
