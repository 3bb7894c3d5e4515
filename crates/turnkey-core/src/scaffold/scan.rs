//! Placeholder discovery.
//!
//! A [`PlaceholderFamily`] pairs a placeholder syntax (a regex with one
//! capture group yielding the variable name) with the settings file that
//! supplies values for it and the format of that file.
//!
//! A pattern may also define a capture group named `default`. A match where
//! that group participates is a reference that carries its own fallback
//! (`${NAME:-x}`, a Terraform `variable` block with `default = ...`), so the
//! name is already defined and is not scaffolded. Matches where the first
//! group does not participate (an escape alternative such as `$$`) are
//! skipped too.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use super::error::ScaffoldError;
use super::settings::SettingsFormat;

/// Capture group marking a reference that supplies its own default.
pub const DEFAULT_GROUP: &str = "default";

/// A compiled placeholder syntax for one configuration family.
#[derive(Debug, Clone)]
pub struct PlaceholderFamily {
    name: String,
    pattern: Regex,
    settings_file: String,
    format: SettingsFormat,
    ignore: BTreeSet<String>,
    ignore_prefixes: Vec<String>,
}

impl PlaceholderFamily {
    /// Compile a family. The pattern must contain at least one capture group;
    /// the first group is taken as the variable name.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        settings_file: impl Into<String>,
        format: SettingsFormat,
    ) -> Result<Self, ScaffoldError> {
        let name = name.into();
        let settings_file = settings_file.into();

        let pattern = Regex::new(pattern).map_err(|e| ScaffoldError::InvalidPattern {
            family: name.clone(),
            reason: e.to_string(),
        })?;
        if pattern.captures_len() < 2 {
            return Err(ScaffoldError::InvalidPattern {
                family: name,
                reason: "pattern must contain a capture group for the variable name".to_string(),
            });
        }
        if settings_file.is_empty()
            || settings_file.contains('/')
            || settings_file.contains('\\')
            || settings_file == "."
            || settings_file == ".."
        {
            return Err(ScaffoldError::InvalidPattern {
                family: name,
                reason: format!("settings file must be a bare file name, got '{settings_file}'"),
            });
        }

        Ok(Self {
            name,
            pattern,
            settings_file,
            format,
            ignore: BTreeSet::new(),
            ignore_prefixes: Vec::new(),
        })
    }

    /// Names matched by the pattern that should never be scaffolded.
    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Name prefixes that are never scaffolded, e.g. `ansible_` facts.
    pub fn with_ignore_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.contains(name) || self.ignore_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings_file(&self) -> &str {
        &self.settings_file
    }

    pub fn format(&self) -> SettingsFormat {
        self.format
    }

    /// Destination of the settings file inside `dir`.
    pub fn settings_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.settings_file)
    }

    /// Distinct variable names referenced in `content` without a default,
    /// sorted.
    pub fn scan(&self, content: &str) -> BTreeSet<String> {
        let mut defaulted = BTreeSet::new();
        let mut names = BTreeSet::new();
        for caps in self.pattern.captures_iter(content) {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if self.is_ignored(name) {
                continue;
            }
            if caps.name(DEFAULT_GROUP).is_some() {
                defaulted.insert(name);
            } else {
                names.insert(name);
            }
        }
        names
            .into_iter()
            .filter(|name| !defaulted.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// Read `path` and scan its full contents.
    pub fn scan_file(&self, path: &Path) -> Result<BTreeSet<String>, ScaffoldError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScaffoldError::NotFound(path.to_path_buf())
            } else {
                ScaffoldError::io("read", path, e)
            }
        })?;
        let names = self.scan(&content);
        debug!(
            family = %self.name,
            path = %path.display(),
            count = names.len(),
            "Scanned placeholders"
        );
        Ok(names)
    }
}
