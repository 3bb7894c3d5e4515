//! Default Ansible inventory scaffolding.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use super::error::ScaffoldError;
use super::settings::write_new_file;
use super::{GeneratedSettingsFile, ScaffoldOutcome, SkipReason};

/// File name of the inventory written next to a playbook.
pub const INVENTORY_FILE: &str = "inventory.ini";

/// Write a localhost inventory next to `playbook` unless one already exists.
pub fn scaffold_inventory(playbook: &Path) -> Result<ScaffoldOutcome, ScaffoldError> {
    if !playbook.is_file() {
        return Err(ScaffoldError::NotFound(playbook.to_path_buf()));
    }

    let dir = playbook.parent().unwrap_or_else(|| Path::new("."));
    let path = dir.join(INVENTORY_FILE);
    if path.exists() {
        info!(path = %path.display(), "Inventory already present, leaving it untouched");
        return Ok(ScaffoldOutcome::Skipped {
            reason: SkipReason::AlreadyExists(path),
        });
    }

    let content = format!(
        "# Default inventory generated by turnkey at {}\n\
         # Replace with your real hosts before deploying remotely.\n\
         \n\
         [local]\n\
         localhost ansible_connection=local\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    write_new_file(&path, &content)?;
    info!(path = %path.display(), "Generated default inventory");

    Ok(ScaffoldOutcome::Written(GeneratedSettingsFile {
        path,
        variable_count: 0,
    }))
}
