//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use turnkey_core::config::TurnkeyConfig;
use turnkey_core::context::AppContext;
use turnkey_core::deploy::Confirm;
use turnkey_core::tools::{CommandRunner, Tool, ToolError, ToolInvocation, ToolOutput};

/// Records invocations instead of spawning processes.
///
/// Responses are matched by command-line prefix; unmatched commands succeed
/// with empty output.
#[derive(Default)]
pub struct FakeRunner {
    available: HashSet<Tool>,
    responses: Vec<(String, ToolOutput)>,
    calls: RefCell<Vec<ToolInvocation>>,
}

impl FakeRunner {
    pub fn with_tools<I: IntoIterator<Item = Tool>>(tools: I) -> Self {
        Self {
            available: tools.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn respond(mut self, prefix: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.responses.push((
            prefix.to_string(),
            ToolOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.borrow().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(ToolInvocation::command_line)
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn locate(&self, tool: Tool) -> Result<PathBuf, ToolError> {
        if self.available.contains(&tool) {
            Ok(PathBuf::from("/usr/bin").join(tool.binary()))
        } else {
            Err(ToolError::Missing(tool))
        }
    }

    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.command_line();
        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(ToolOutput {
                code: Some(0),
                ..Default::default()
            }))
    }
}

/// Answers with a fixed value and records every prompt.
pub struct RecordingConfirm {
    answer: bool,
    prompts: RefCell<Vec<String>>,
}

impl RecordingConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirm for RecordingConfirm {
    fn confirm(&self, prompt: &str) -> anyhow::Result<bool> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.answer)
    }
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all should succeed");
    }
    std::fs::write(path, content).expect("write should succeed");
}

pub fn context(root: &Path) -> AppContext {
    AppContext::new(root.to_path_buf(), TurnkeyConfig::default())
}

pub const COMPOSE_WITH_PLACEHOLDERS: &str = r#"services:
  db:
    image: postgres:16
    environment:
      POSTGRES_PASSWORD: ${APP_PASSWORD}
      POSTGRES_DB: ${APP_DATABASE}
"#;

/// Workspace with one target of every kind.
pub fn sample_workspace(root: &Path) {
    write(
        &root.join("docker-compose/widgets/compose.yaml"),
        COMPOSE_WITH_PLACEHOLDERS,
    );
    write(
        &root.join("kubernetes/gadgets/helm/values.yaml"),
        "replicaCount: 1\n",
    );
    write(
        &root.join("kubernetes/gadgets/helm/Chart.yaml"),
        "apiVersion: v2\nname: gadgets\nversion: 0.1.0\n",
    );
    write(
        &root.join("ansible/webserver/site.yaml"),
        "- hosts: all\n  tasks:\n    - debug: msg=\"{{ admin_email }}\"\n",
    );
    write(
        &root.join("terraform/network/main.tf"),
        "variable \"region\" {}\nvariable \"db_password\" {}\n",
    );
    write(
        &root.join("terraform/network/outputs.tf"),
        "variable \"domain\" {}\noutput \"id\" { value = 1 }\n",
    );
}
