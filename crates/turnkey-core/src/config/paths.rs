//! Config path resolution helpers.

use std::path::{Path, PathBuf};

/// File name of both configuration layers.
pub const CONFIG_FILE: &str = "turnkey.toml";

/// Global config file inside `global_dir`.
pub fn global_config_path(global_dir: &Path) -> PathBuf {
    global_dir.join(CONFIG_FILE)
}

/// Project config file at the workspace root.
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Default global config directory (`$XDG_CONFIG_HOME/turnkey` on Unix).
pub fn default_global_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("turnkey"))
}
