//! Shared core types used across the catalog, scaffolder and planner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tools::Tool;

/// Kind of deployment target, one per wrapped tool family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Docker Compose application (`docker-compose/<name>/compose.yaml`).
    Docker,
    /// Helm chart (`kubernetes/<name>/helm/values.yaml`).
    Kubernetes,
    /// Ansible playbook (any `*.yaml` under `ansible/`).
    Ansible,
    /// Terraform configuration (`terraform/<name>/*.tf`).
    Terraform,
}

impl TargetKind {
    pub const ALL: [TargetKind; 4] = [
        TargetKind::Docker,
        TargetKind::Kubernetes,
        TargetKind::Ansible,
        TargetKind::Terraform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Docker => "docker",
            TargetKind::Kubernetes => "kubernetes",
            TargetKind::Ansible => "ansible",
            TargetKind::Terraform => "terraform",
        }
    }

    /// External tool that deploys targets of this kind.
    pub fn tool(&self) -> Tool {
        match self {
            TargetKind::Docker => Tool::Docker,
            TargetKind::Kubernetes => Tool::Helm,
            TargetKind::Ansible => Tool::AnsiblePlaybook,
            TargetKind::Terraform => Tool::Terraform,
        }
    }

    /// Placeholder family key used to scaffold settings for this kind.
    ///
    /// Helm values files carry no placeholders, so Kubernetes has none.
    pub fn family_key(&self) -> Option<&'static str> {
        match self {
            TargetKind::Docker => Some("compose"),
            TargetKind::Kubernetes => None,
            TargetKind::Ansible => Some("ansible"),
            TargetKind::Terraform => Some("terraform"),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docker" | "compose" => Ok(TargetKind::Docker),
            "kubernetes" | "k8s" | "helm" => Ok(TargetKind::Kubernetes),
            "ansible" => Ok(TargetKind::Ansible),
            "terraform" | "tf" => Ok(TargetKind::Terraform),
            _ => anyhow::bail!(
                "Unknown target kind: {}. Use 'docker', 'kubernetes', 'ansible', or 'terraform'",
                s
            ),
        }
    }
}
