//! Translate an action on a target into tool invocations.

use std::path::Path;

use serde::Serialize;

use crate::scaffold::{INVENTORY_FILE, PlaceholderFamily};
use crate::targets::{HELM_CHART_DIR, Target};
use crate::tools::{Tool, ToolInvocation, path_arg};
use crate::types::TargetKind;

/// What to do with a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Bring the target up.
    Deploy,
    /// Tear the target down.
    Stop,
    /// Syntax/lint validation delegated to the tool.
    Check,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Deploy => "deploy",
            Action::Stop => "stop",
            Action::Check => "check",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tool invocation in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub invocation: ToolInvocation,
    /// Destructive or auto-approved steps need operator confirmation.
    pub requires_confirmation: bool,
}

impl PlanStep {
    pub(crate) fn run(invocation: ToolInvocation) -> Self {
        Self {
            invocation,
            requires_confirmation: false,
        }
    }

    pub(crate) fn confirmed(invocation: ToolInvocation) -> Self {
        Self {
            invocation,
            requires_confirmation: true,
        }
    }
}

/// Ordered invocations for an action; run until the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub action: Action,
    pub tool: Tool,
    pub steps: Vec<PlanStep>,
}

/// Build the plan for `action` on `target`.
///
/// Settings files and inventories are referenced only if they exist when
/// the plan is built, so scaffold first.
pub fn plan_action(
    action: Action,
    target: &Target,
    family: Option<&PlaceholderFamily>,
) -> anyhow::Result<ActionPlan> {
    let settings = family
        .map(|f| f.settings_path(&target.dir))
        .filter(|p| p.is_file());

    let steps = match target.kind {
        TargetKind::Docker => plan_compose(action, target),
        TargetKind::Kubernetes => plan_helm(action, target),
        TargetKind::Ansible => plan_ansible(action, target, settings.as_deref())?,
        TargetKind::Terraform => plan_terraform(action, target, settings.as_deref()),
    };

    Ok(ActionPlan {
        action,
        tool: target.kind.tool(),
        steps,
    })
}

fn plan_compose(action: Action, target: &Target) -> Vec<PlanStep> {
    let base = ToolInvocation::for_tool(Tool::Docker)
        .current_dir(&target.dir)
        .args(["compose", "-f"])
        .arg(path_arg(&target.config_path));

    match action {
        Action::Deploy => vec![PlanStep::run(base.args(["up", "-d"]))],
        Action::Stop => vec![PlanStep::confirmed(base.arg("down"))],
        Action::Check => vec![PlanStep::run(base.args(["config", "--quiet"]))],
    }
}

fn plan_helm(action: Action, target: &Target) -> Vec<PlanStep> {
    let chart = path_arg(&target.dir.join(HELM_CHART_DIR));
    let helm = || ToolInvocation::for_tool(Tool::Helm).current_dir(&target.dir);

    match action {
        Action::Deploy => vec![PlanStep::run(
            helm()
                .args(["upgrade", "--install"])
                .arg(&target.name)
                .arg(chart)
                .arg("--namespace")
                .arg(&target.name)
                .arg("--create-namespace")
                .arg("-f")
                .arg(path_arg(&target.config_path)),
        )],
        Action::Stop => vec![PlanStep::confirmed(
            helm()
                .arg("uninstall")
                .arg(&target.name)
                .arg("--namespace")
                .arg(&target.name),
        )],
        Action::Check => vec![PlanStep::run(helm().arg("lint").arg(chart))],
    }
}

fn plan_ansible(
    action: Action,
    target: &Target,
    settings: Option<&Path>,
) -> anyhow::Result<Vec<PlanStep>> {
    let mut base = ToolInvocation::for_tool(Tool::AnsiblePlaybook).current_dir(&target.dir);
    let inventory = target.dir.join(INVENTORY_FILE);
    if inventory.is_file() {
        base = base.arg("-i").arg(path_arg(&inventory));
    }

    match action {
        Action::Deploy => {
            if let Some(settings) = settings {
                base = base.arg("-e").arg(format!("@{}", path_arg(settings)));
            }
            Ok(vec![PlanStep::run(base.arg(path_arg(&target.config_path)))])
        }
        Action::Check => Ok(vec![PlanStep::run(
            base.arg("--syntax-check")
                .arg(path_arg(&target.config_path)),
        )]),
        Action::Stop => anyhow::bail!(
            "Stopping is not supported for ansible targets ('{}' is a one-shot playbook run)",
            target.name
        ),
    }
}

fn plan_terraform(action: Action, target: &Target, settings: Option<&Path>) -> Vec<PlanStep> {
    let terraform = || ToolInvocation::for_tool(Tool::Terraform).current_dir(&target.dir);
    let with_vars = |invocation: ToolInvocation| match settings {
        Some(path) => invocation.arg(format!("-var-file={}", path_arg(path))),
        None => invocation,
    };
    let init = || terraform().args(["init", "-input=false"]);

    match action {
        Action::Deploy => vec![
            PlanStep::run(init()),
            PlanStep::confirmed(with_vars(
                terraform().args(["apply", "-input=false", "-auto-approve"]),
            )),
        ],
        Action::Stop => vec![
            PlanStep::run(init()),
            PlanStep::confirmed(with_vars(
                terraform().args(["destroy", "-input=false", "-auto-approve"]),
            )),
        ],
        Action::Check => vec![
            PlanStep::run(terraform().args(["init", "-backend=false", "-input=false"])),
            PlanStep::run(terraform().arg("validate")),
        ],
    }
}
