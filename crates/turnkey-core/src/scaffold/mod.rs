//! Settings-file scaffolding.
//!
//! Scans a target's declarative configuration for placeholder references,
//! classifies each name, and writes a settings file of placeholder values
//! next to it. An existing settings file is never touched: its presence is
//! the only guard, so repeated calls become no-ops once it exists.

pub mod classify;
pub mod error;
pub mod inventory;
pub mod scan;
pub mod settings;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

pub use classify::{Classifier, ClassificationRule, RULES, ValueGenerator};
pub use error::ScaffoldError;
pub use inventory::{INVENTORY_FILE, scaffold_inventory};
pub use scan::PlaceholderFamily;
pub use settings::SettingsFormat;

use crate::types::TargetKind;

/// Descriptor of a settings file written by the scaffolder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSettingsFile {
    pub path: PathBuf,
    pub variable_count: usize,
}

/// Why a scaffold produced no file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum SkipReason {
    /// A file already exists at the destination.
    AlreadyExists(PathBuf),
    /// The configuration references no placeholders.
    NoPlaceholders,
    /// Targets of this kind have no placeholder family.
    NoFamily(TargetKind),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AlreadyExists(path) => write!(f, "{} already exists", path.display()),
            SkipReason::NoPlaceholders => f.write_str("no placeholders found"),
            SkipReason::NoFamily(kind) => write!(f, "{kind} targets have no settings to scaffold"),
        }
    }
}

/// Result of a scaffold attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScaffoldOutcome {
    Written(GeneratedSettingsFile),
    Skipped { reason: SkipReason },
}

impl ScaffoldOutcome {
    pub fn written(&self) -> Option<&GeneratedSettingsFile> {
        match self {
            ScaffoldOutcome::Written(file) => Some(file),
            ScaffoldOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ScaffoldOutcome::Skipped { .. })
    }
}

/// Scaffold the settings file for a single configuration file.
///
/// The destination is `family.settings_file` in `config_path`'s directory.
pub fn generate(
    target: &str,
    config_path: &Path,
    family: &PlaceholderFamily,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    let dest_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    generate_for_sources(target, &[config_path.to_path_buf()], &dest_dir, family)
}

/// Scaffold one settings file from the union of placeholders in `sources`.
pub fn generate_for_sources(
    target: &str,
    sources: &[PathBuf],
    dest_dir: &Path,
    family: &PlaceholderFamily,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    if let Some(missing) = sources.iter().find(|p| !p.is_file()) {
        return Err(ScaffoldError::NotFound(missing.clone()));
    }

    let dest = family.settings_path(dest_dir);
    if dest.exists() {
        info!(path = %dest.display(), "Settings file already present, leaving it untouched");
        return Ok(ScaffoldOutcome::Skipped {
            reason: SkipReason::AlreadyExists(dest),
        });
    }

    let mut names = BTreeSet::new();
    for source in sources {
        names.extend(family.scan_file(source)?);
    }
    if names.is_empty() {
        info!(
            target_name = target,
            family = family.name(),
            "No placeholders found, nothing to scaffold"
        );
        return Ok(ScaffoldOutcome::Skipped {
            reason: SkipReason::NoPlaceholders,
        });
    }

    let classifier = Classifier::new(target);
    let entries: Vec<(String, String)> = names
        .into_iter()
        .map(|name| {
            let value = classifier.classify(&name);
            (name, value)
        })
        .collect();

    let content = settings::render(target, family.format(), &entries, Utc::now());
    settings::write_new_file(&dest, &content)?;

    info!(
        target_name = target,
        path = %dest.display(),
        variables = entries.len(),
        "Generated settings file"
    );

    Ok(ScaffoldOutcome::Written(GeneratedSettingsFile {
        path: dest,
        variable_count: entries.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcomes_serialize_with_status_tag() {
        let written = ScaffoldOutcome::Written(GeneratedSettingsFile {
            path: PathBuf::from("/srv/app/.env"),
            variable_count: 3,
        });
        assert_eq!(
            serde_json::to_value(&written).unwrap(),
            json!({"status": "written", "path": "/srv/app/.env", "variable_count": 3})
        );

        let skipped = ScaffoldOutcome::Skipped {
            reason: SkipReason::NoFamily(TargetKind::Kubernetes),
        };
        assert_eq!(
            serde_json::to_value(&skipped).unwrap(),
            json!({"status": "skipped", "reason": {"reason": "no-family", "detail": "kubernetes"}})
        );
    }

    #[test]
    fn skip_reasons_read_as_sentences() {
        assert_eq!(SkipReason::NoPlaceholders.to_string(), "no placeholders found");
        assert_eq!(
            SkipReason::AlreadyExists(PathBuf::from("a/.env")).to_string(),
            "a/.env already exists"
        );
    }
}
