//! Settings file rendering and no-clobber atomic writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::error::ScaffoldError;

/// Line format of a generated settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsFormat {
    /// `NAME=value`, unquoted (Compose `.env`).
    #[default]
    Env,
    /// `name = "value"` (Terraform `.tfvars`).
    Tfvars,
    /// `name: "value"` (Ansible vars file).
    Yaml,
}

impl SettingsFormat {
    pub fn line(&self, name: &str, value: &str) -> String {
        match self {
            SettingsFormat::Env => format!("{name}={value}"),
            SettingsFormat::Tfvars => format!("{name} = \"{value}\""),
            SettingsFormat::Yaml => format!("{name}: \"{value}\""),
        }
    }
}

/// Render a settings file: header comment block, then one line per entry.
///
/// Entries are written in the order given; callers pass them sorted.
pub fn render(
    target: &str,
    format: SettingsFormat,
    entries: &[(String, String)],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Settings for target '{target}'\n"));
    out.push_str(&format!(
        "# Generated by turnkey at {}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    out.push_str("# Values below are placeholders. Review and replace them before deploying.\n");
    out.push_str("# This file is never overwritten; delete it to regenerate.\n");
    out.push('\n');
    if format == SettingsFormat::Yaml {
        out.push_str("---\n");
    }
    for (name, value) in entries {
        out.push_str(&format.line(name, value));
        out.push('\n');
    }
    out
}

/// Write `content` to `path`, which must not exist yet.
///
/// The content goes to a temporary sibling first and is synced before being
/// renamed into place, so `path` is either absent or complete.
pub(crate) fn write_new_file(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    let tmp_path = temp_path_for(path);

    let result = write_and_sync(&tmp_path, content).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| ScaffoldError::io("rename into", path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_sync(tmp_path: &Path, content: &str) -> Result<(), ScaffoldError> {
    let mut file = File::create(tmp_path).map_err(|e| ScaffoldError::io("create", tmp_path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| ScaffoldError::io("write", tmp_path, e))?;
    file.sync_all()
        .map_err(|e| ScaffoldError::io("sync", tmp_path, e))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "settings".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}
