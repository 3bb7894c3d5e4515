//! Config store for loading the layered turnkey.toml files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::merge::merge_layers;
use super::parser::parse_turnkey_toml;
use super::paths::{global_config_path, project_config_path};
use super::schema::{ConfigLayer, TurnkeyConfig};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    global_path: Option<PathBuf>,
    project_path: PathBuf,
}

impl ConfigStore {
    /// Store for a workspace root, with the global layer from the user config
    /// directory when one can be determined.
    pub fn for_root(root: &Path) -> Self {
        let global_dir = super::paths::default_global_dir();
        Self::from_paths(global_dir.as_deref(), root)
    }

    pub fn from_paths(global_dir: Option<&Path>, root: &Path) -> Self {
        Self {
            global_path: global_dir.map(global_config_path),
            project_path: project_config_path(root),
        }
    }

    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Load and validate the merged configuration. Missing files are skipped.
    pub fn load(&self) -> anyhow::Result<TurnkeyConfig> {
        let mut layers = Vec::new();
        if let Some(global) = &self.global_path {
            if let Some(layer) = load_layer(global)? {
                layers.push(layer);
            }
        }
        if let Some(layer) = load_layer(&self.project_path)? {
            layers.push(layer);
        }

        let config = merge_layers(&layers);
        config
            .validate()
            .context("Invalid turnkey configuration")?;
        Ok(config)
    }
}

fn load_layer(path: &Path) -> anyhow::Result<Option<ConfigLayer>> {
    if !path.exists() {
        return Ok(None);
    }
    debug!(path = %path.display(), "Loading config layer");
    parse_turnkey_toml(path).map(Some)
}
