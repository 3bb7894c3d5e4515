//! Application context shared by all commands.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::{ConfigStore, TurnkeyConfig};
use crate::scaffold::PlaceholderFamily;
use crate::targets::TargetCatalog;
use crate::types::TargetKind;

/// Environment variable naming the workspace root.
pub const ROOT_ENV: &str = "TURNKEY_ROOT";

/// Workspace root plus resolved configuration.
///
/// Frontends create this once and hand it to commands.
#[derive(Debug, Clone)]
pub struct AppContext {
    root: PathBuf,
    config: TurnkeyConfig,
}

impl AppContext {
    /// Create a context with an already resolved configuration.
    pub fn new(root: PathBuf, config: TurnkeyConfig) -> Self {
        Self { root, config }
    }

    /// Load the layered configuration for `root`.
    pub fn load(root: PathBuf) -> anyhow::Result<Self> {
        let config = ConfigStore::for_root(&root).load()?;
        Ok(Self::new(root, config))
    }

    /// Load using the root from `explicit`, `TURNKEY_ROOT`, or the current
    /// directory, in that order.
    pub fn with_defaults(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        Self::load(resolve_root(explicit)?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &TurnkeyConfig {
        &self.config
    }

    pub fn catalog(&self) -> TargetCatalog {
        TargetCatalog::new(self.root.clone(), self.config.paths.clone())
    }

    /// Compiled placeholder family for targets of `kind`.
    pub fn family_for(&self, kind: TargetKind) -> anyhow::Result<Option<PlaceholderFamily>> {
        self.config
            .family_for(kind)
            .with_context(|| format!("Invalid placeholder family for {kind} targets"))
    }
}

/// Pick the workspace root.
pub fn resolve_root(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().context("Could not determine current directory")
}
