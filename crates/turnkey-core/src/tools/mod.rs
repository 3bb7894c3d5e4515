//! External tool lookup and structured invocation.
//!
//! Every external program is described by a [`ToolInvocation`] and run
//! through a [`CommandRunner`]. The exit code is the only success signal;
//! stdout and stderr are captured separately and never parsed for status.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// External binaries turnkey drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Docker,
    Helm,
    Kubectl,
    AnsiblePlaybook,
    Terraform,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Docker,
        Tool::Helm,
        Tool::Kubectl,
        Tool::AnsiblePlaybook,
        Tool::Terraform,
    ];

    /// Executable name looked up on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            Tool::Docker => "docker",
            Tool::Helm => "helm",
            Tool::Kubectl => "kubectl",
            Tool::AnsiblePlaybook => "ansible-playbook",
            Tool::Terraform => "terraform",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::Docker => "container runtime (docker compose)",
            Tool::Helm => "Kubernetes package manager",
            Tool::Kubectl => "Kubernetes cluster client",
            Tool::AnsiblePlaybook => "configuration-management runner",
            Tool::Terraform => "infrastructure provisioner",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("'{}' was not found on PATH (needed as the {})", .0.binary(), .0.description())]
    Missing(Tool),

    #[error("Failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed with {}{}", exit_label(*code), stderr_suffix(stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
        }
    }

    pub fn for_tool(tool: Tool) -> Self {
        Self::new(tool.binary())
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Command line for display and logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ToolOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Convert a non-zero exit into [`ToolError::Failed`].
    pub fn into_result(self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                command: invocation.command_line(),
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Seam between planning and process execution.
pub trait CommandRunner {
    /// Resolve `tool` to an executable path.
    fn locate(&self, tool: Tool) -> Result<PathBuf, ToolError>;

    /// Run `invocation` to completion. A non-zero exit is not an error here;
    /// callers inspect [`ToolOutput::success`].
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError>;
}

/// Runs real processes and searches the real PATH.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn locate(&self, tool: Tool) -> Result<PathBuf, ToolError> {
        which::which(tool.binary()).map_err(|_| ToolError::Missing(tool))
    }

    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        debug!(command = %invocation.command_line(), cwd = ?invocation.cwd, "Running tool");

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).envs(&invocation.env);
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| ToolError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Look up `tool` on PATH.
pub fn locate(tool: Tool) -> Result<PathBuf, ToolError> {
    SystemRunner.locate(tool)
}

/// Render a path argument for a tool command line.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
