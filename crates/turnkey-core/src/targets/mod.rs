//! Target discovery by directory convention.
//!
//! | Kind       | A target `<name>` is                                        |
//! |------------|-------------------------------------------------------------|
//! | docker     | `<docker dir>/<name>/compose.yaml`                          |
//! | kubernetes | `<kubernetes dir>/<name>/helm/values.yaml`                  |
//! | ansible    | any playbook `*.yaml` below `<ansible dir>`, named by stem  |
//! | terraform  | `<terraform dir>/<name>/` holding at least one `*.tf` file  |
//!
//! A target's `dir` is where its settings file lives. Ansible playbooks in
//! the same directory therefore share one `secrets.yaml` and one inventory:
//! the first playbook scaffolded writes them, and its siblings then report
//! `AlreadyExists`. Variables only a sibling uses have to be added by hand,
//! or the playbooks moved into their own directories.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::PathsConfig;
use crate::scaffold::INVENTORY_FILE;
use crate::types::TargetKind;

pub const COMPOSE_FILE: &str = "compose.yaml";
pub const HELM_CHART_DIR: &str = "helm";
pub const HELM_VALUES_FILE: &str = "values.yaml";

/// Files under the Ansible directory that are never playbooks.
const ANSIBLE_RESERVED: &[&str] = &["secrets.yaml", "inventory.yaml", INVENTORY_FILE];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No {kind} target named '{name}' under {}", dir.display())]
    TargetNotFound {
        kind: TargetKind,
        name: String,
        dir: PathBuf,
    },

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A resolved deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub kind: TargetKind,
    pub name: String,
    /// Directory the target lives in; settings files are written here.
    pub dir: PathBuf,
    /// Primary configuration file (compose file, values file, playbook, or
    /// the first `*.tf` file).
    pub config_path: PathBuf,
}

impl Target {
    /// Every `*.tf` file of a Terraform target, sorted. Other kinds have a
    /// single source: `config_path`.
    pub fn sources(&self) -> Result<Vec<PathBuf>, CatalogError> {
        match self.kind {
            TargetKind::Terraform => tf_files(&self.dir),
            _ => Ok(vec![self.config_path.clone()]),
        }
    }
}

/// Lists and resolves targets under a workspace root.
#[derive(Debug, Clone)]
pub struct TargetCatalog {
    root: PathBuf,
    paths: PathsConfig,
}

impl TargetCatalog {
    pub fn new(root: impl Into<PathBuf>, paths: PathsConfig) -> Self {
        Self {
            root: root.into(),
            paths,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all targets of `kind`.
    pub fn kind_dir(&self, kind: TargetKind) -> PathBuf {
        self.root.join(self.paths.dir_for(kind))
    }

    /// All targets of `kind`, sorted by name. A missing kind directory
    /// yields an empty list.
    pub fn list(&self, kind: TargetKind) -> Result<Vec<Target>, CatalogError> {
        let dir = self.kind_dir(kind);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut targets = match kind {
            TargetKind::Ansible => self.list_playbooks(&dir)?,
            _ => {
                let mut found = Vec::new();
                for entry in read_dir_sorted(&dir)? {
                    if let Some(target) = self.target_in_dir(kind, &entry)? {
                        found.push(target);
                    }
                }
                found
            }
        };
        targets.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.config_path.cmp(&b.config_path)));
        Ok(targets)
    }

    /// Targets of every kind, grouped in kind order.
    pub fn list_all(&self) -> Result<Vec<Target>, CatalogError> {
        let mut all = Vec::new();
        for kind in TargetKind::ALL {
            all.extend(self.list(kind)?);
        }
        Ok(all)
    }

    /// Resolve `name` to a target of `kind`.
    ///
    /// Ansible playbooks match by stem: an exact match wins, otherwise the
    /// first playbook in path order whose stem starts with `name`.
    pub fn resolve(&self, kind: TargetKind, name: &str) -> Result<Target, CatalogError> {
        let not_found = || CatalogError::TargetNotFound {
            kind,
            name: name.to_string(),
            dir: self.kind_dir(kind),
        };

        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(not_found());
        }

        match kind {
            TargetKind::Ansible => {
                let dir = self.kind_dir(kind);
                if !dir.is_dir() {
                    return Err(not_found());
                }
                let mut playbooks = self.list_playbooks(&dir)?;
                playbooks.sort_by(|a, b| a.config_path.cmp(&b.config_path));
                let index = playbooks
                    .iter()
                    .position(|t| t.name == name)
                    .or_else(|| playbooks.iter().position(|t| t.name.starts_with(name)));
                index
                    .map(|i| playbooks.swap_remove(i))
                    .ok_or_else(not_found)
            }
            _ => {
                let dir = self.kind_dir(kind).join(name);
                self.target_in_dir(kind, &dir)?.ok_or_else(not_found)
            }
        }
    }

    fn target_in_dir(&self, kind: TargetKind, dir: &Path) -> Result<Option<Target>, CatalogError> {
        if !dir.is_dir() {
            return Ok(None);
        }
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().to_string()) else {
            return Ok(None);
        };

        let config_path = match kind {
            TargetKind::Docker => Some(dir.join(COMPOSE_FILE)).filter(|p| p.is_file()),
            TargetKind::Kubernetes => Some(dir.join(HELM_CHART_DIR).join(HELM_VALUES_FILE))
                .filter(|p| p.is_file()),
            TargetKind::Terraform => tf_files(dir)?.into_iter().next(),
            TargetKind::Ansible => None,
        };

        Ok(config_path.map(|config_path| Target {
            kind,
            name,
            dir: dir.to_path_buf(),
            config_path,
        }))
    }

    fn list_playbooks(&self, dir: &Path) -> Result<Vec<Target>, CatalogError> {
        let mut playbooks = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| CatalogError::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !file_name.ends_with(".yaml") || ANSIBLE_RESERVED.contains(&file_name.as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            playbooks.push(Target {
                kind: TargetKind::Ansible,
                name: stem,
                dir: path.parent().unwrap_or(dir).to_path_buf(),
                config_path: path.to_path_buf(),
            });
        }
        Ok(playbooks)
    }
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        entries.push(entry.map_err(io_err)?.path());
    }
    entries.sort();
    Ok(entries)
}

fn tf_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    Ok(read_dir_sorted(dir)?
        .into_iter()
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "tf"))
        .collect())
}
