//! Status collection for discovered targets.
//!
//! Reports, per target, whether its settings file exists and what the
//! wrapped tool says about it:
//! - docker: running if any container name contains the target name
//! - kubernetes: deployed if `helm status` exits 0
//! - ansible, terraform: no tool-side state, always unknown

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::AppContext;
use crate::targets::Target;
use crate::tools::{CommandRunner, Tool, ToolInvocation};
use crate::types::TargetKind;

// =============================================================================
// Data Structures
// =============================================================================

/// Tool-reported state of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetState {
    Running,
    Stopped,
    Deployed,
    NotDeployed,
    Unknown,
}

/// Whether the target's scaffolded settings file exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingsState {
    Present,
    Missing,
    /// The kind has no placeholder family
    NotApplicable,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetStatus {
    pub kind: TargetKind,
    pub name: String,
    pub config_path: PathBuf,
    pub settings_path: Option<PathBuf>,
    pub settings: SettingsState,
    pub state: TargetState,
}

/// Summary counts for quick overview
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub running: usize,
    pub missing_settings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub root: PathBuf,
    pub kind_filter: Option<TargetKind>,
    pub targets: Vec<TargetStatus>,
    pub summary: StatusSummary,
}

// =============================================================================
// Command
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    pub kind: Option<TargetKind>,
}

impl StatusOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: TargetKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

pub struct StatusCommand<'a> {
    ctx: &'a AppContext,
    runner: &'a dyn CommandRunner,
}

impl<'a> StatusCommand<'a> {
    pub fn new(ctx: &'a AppContext, runner: &'a dyn CommandRunner) -> Self {
        Self { ctx, runner }
    }

    pub fn execute(&self, options: &StatusOptions) -> anyhow::Result<StatusReport> {
        let catalog = self.ctx.catalog();
        let targets = match options.kind {
            Some(kind) => catalog.list(kind)?,
            None => catalog.list_all()?,
        };

        let containers = if targets.iter().any(|t| t.kind == TargetKind::Docker) {
            self.running_containers()
        } else {
            None
        };
        let helm_available = self.runner.locate(Tool::Helm).is_ok();

        let mut statuses = Vec::with_capacity(targets.len());
        for target in &targets {
            let (settings_path, settings) = self.settings_state(target)?;
            let state = match target.kind {
                TargetKind::Docker => docker_state(&target.name, containers.as_deref()),
                TargetKind::Kubernetes if helm_available => self.helm_state(&target.name),
                _ => TargetState::Unknown,
            };
            statuses.push(TargetStatus {
                kind: target.kind,
                name: target.name.clone(),
                config_path: target.config_path.clone(),
                settings_path,
                settings,
                state,
            });
        }

        let summary = StatusSummary {
            total: statuses.len(),
            running: statuses
                .iter()
                .filter(|s| matches!(s.state, TargetState::Running | TargetState::Deployed))
                .count(),
            missing_settings: statuses
                .iter()
                .filter(|s| s.settings == SettingsState::Missing)
                .count(),
        };

        Ok(StatusReport {
            root: self.ctx.root().to_path_buf(),
            kind_filter: options.kind,
            targets: statuses,
            summary,
        })
    }

    fn settings_state(
        &self,
        target: &Target,
    ) -> anyhow::Result<(Option<PathBuf>, SettingsState)> {
        Ok(match self.ctx.family_for(target.kind)? {
            Some(family) => {
                let path = family.settings_path(&target.dir);
                let state = if path.is_file() {
                    SettingsState::Present
                } else {
                    SettingsState::Missing
                };
                (Some(path), state)
            }
            None => (None, SettingsState::NotApplicable),
        })
    }

    /// Names of running containers, or `None` if docker is unusable.
    fn running_containers(&self) -> Option<Vec<String>> {
        self.runner.locate(Tool::Docker).ok()?;
        let invocation = ToolInvocation::for_tool(Tool::Docker).args(["ps", "--format", "{{.Names}}"]);
        match self.runner.run(&invocation) {
            Ok(output) if output.success() => Some(
                output
                    .stdout
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Ok(output) => {
                debug!(code = ?output.code, "docker ps failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "docker ps could not run");
                None
            }
        }
    }

    fn helm_state(&self, name: &str) -> TargetState {
        let invocation = ToolInvocation::for_tool(Tool::Helm)
            .arg("status")
            .arg(name)
            .arg("--namespace")
            .arg(name);
        match self.runner.run(&invocation) {
            Ok(output) if output.success() => TargetState::Deployed,
            Ok(_) => TargetState::NotDeployed,
            Err(_) => TargetState::Unknown,
        }
    }
}

fn docker_state(name: &str, containers: Option<&[String]>) -> TargetState {
    match containers {
        Some(names) if names.iter().any(|c| c.contains(name)) => TargetState::Running,
        Some(_) => TargetState::Stopped,
        None => TargetState::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_state_matches_container_substring() {
        let containers = vec!["widgets-db-1".to_string(), "other".to_string()];
        assert_eq!(
            docker_state("widgets", Some(&containers)),
            TargetState::Running
        );
        assert_eq!(docker_state("gadgets", Some(&containers)), TargetState::Stopped);
        assert_eq!(docker_state("widgets", None), TargetState::Unknown);
    }
}
