//! Dependency check: which external tools are installed.

use std::path::PathBuf;

use serde::Serialize;

use crate::tools::{CommandRunner, Tool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    pub tool: Tool,
    pub binary: &'static str,
    pub description: &'static str,
    /// Resolved executable, `None` when missing.
    pub path: Option<PathBuf>,
}

impl DependencyStatus {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Look up every known tool.
pub fn check_dependencies(runner: &dyn CommandRunner) -> Vec<DependencyStatus> {
    Tool::ALL
        .into_iter()
        .map(|tool| DependencyStatus {
            tool,
            binary: tool.binary(),
            description: tool.description(),
            path: runner.locate(tool).ok(),
        })
        .collect()
}
