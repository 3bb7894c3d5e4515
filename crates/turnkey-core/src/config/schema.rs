//! Configuration schema for turnkey.toml
//!
//! Two layers are read: the global file under the user config directory and
//! the project file at the workspace root. [`ConfigLayer`] is what a single
//! file contains (every field optional); [`TurnkeyConfig`] is the resolved
//! result after layering onto the built-in defaults.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::scaffold::{PlaceholderFamily, ScaffoldError, SettingsFormat};
use crate::types::TargetKind;

/// Contents of a single turnkey.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub paths: PathsLayer,

    /// Placeholder families, replacing built-ins with the same key.
    #[serde(default)]
    pub families: HashMap<String, FamilyConfig>,
}

/// Directory overrides, relative to the workspace root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsLayer {
    pub docker: Option<String>,
    pub kubernetes: Option<String>,
    pub ansible: Option<String>,
    pub terraform: Option<String>,
}

/// Placeholder family as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyConfig {
    /// Regex whose first capture group is the variable name. A match where a
    /// group named `default` participates is treated as already defined.
    pub pattern: String,

    /// Settings file name, written next to the scanned configuration.
    pub settings_file: String,

    #[serde(default)]
    pub format: SettingsFormat,

    /// Matched names that are never scaffolded.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Name prefixes that are never scaffolded.
    #[serde(default)]
    pub ignore_prefixes: Vec<String>,
}

/// Variables Ansible defines itself. Facts and connection variables are
/// covered by the `ansible_` prefix.
const ANSIBLE_MAGIC_VARIABLES: &[&str] = &[
    "item",
    "omit",
    "inventory_hostname",
    "inventory_hostname_short",
    "inventory_dir",
    "inventory_file",
    "hostvars",
    "groups",
    "group_names",
    "play_hosts",
    "role_name",
    "role_names",
    "role_path",
    "playbook_dir",
];

impl FamilyConfig {
    /// Built-in family for a key, if one exists.
    pub fn builtin(key: &str) -> Option<FamilyConfig> {
        match key {
            "compose" => Some(FamilyConfig {
                // `$$` is Compose's escape for a literal dollar sign.
                pattern: r"\$\$|\$\{([A-Z_][A-Z0-9_]*)(?P<default>:?-)?".to_string(),
                settings_file: ".env".to_string(),
                format: SettingsFormat::Env,
                ignore: Vec::new(),
                ignore_prefixes: Vec::new(),
            }),
            "terraform" => Some(FamilyConfig {
                // Looks for `default =` in the block body, through one level of
                // nested braces (validation blocks, object types).
                pattern: r#"variable\s+"([A-Za-z_][A-Za-z0-9_-]*)"\s*\{(?P<default>(?:[^{}]|\{[^{}]*\})*?\bdefault\s*=)?"#
                    .to_string(),
                settings_file: "terraform.tfvars".to_string(),
                format: SettingsFormat::Tfvars,
                ignore: Vec::new(),
                ignore_prefixes: Vec::new(),
            }),
            "ansible" => Some(FamilyConfig {
                pattern: r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*[|}]".to_string(),
                settings_file: "secrets.yaml".to_string(),
                format: SettingsFormat::Yaml,
                ignore: ANSIBLE_MAGIC_VARIABLES
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
                ignore_prefixes: vec!["ansible_".to_string()],
            }),
            _ => None,
        }
    }

    /// Compile into a usable [`PlaceholderFamily`].
    pub fn compile(&self, key: &str) -> Result<PlaceholderFamily, ScaffoldError> {
        Ok(
            PlaceholderFamily::new(key, &self.pattern, &self.settings_file, self.format)?
                .with_ignore(self.ignore.iter().cloned())
                .with_ignore_prefixes(self.ignore_prefixes.iter().cloned()),
        )
    }
}

/// Directory names for each target kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathsConfig {
    pub docker: String,
    pub kubernetes: String,
    pub ansible: String,
    pub terraform: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            docker: "docker-compose".to_string(),
            kubernetes: "kubernetes".to_string(),
            ansible: "ansible".to_string(),
            terraform: "terraform".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn dir_for(&self, kind: TargetKind) -> &str {
        match kind {
            TargetKind::Docker => &self.docker,
            TargetKind::Kubernetes => &self.kubernetes,
            TargetKind::Ansible => &self.ansible,
            TargetKind::Terraform => &self.terraform,
        }
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnkeyConfig {
    pub paths: PathsConfig,
    pub families: BTreeMap<String, FamilyConfig>,
}

impl Default for TurnkeyConfig {
    fn default() -> Self {
        let families = ["compose", "terraform", "ansible"]
            .into_iter()
            .filter_map(|key| FamilyConfig::builtin(key).map(|f| (key.to_string(), f)))
            .collect();
        Self {
            paths: PathsConfig::default(),
            families,
        }
    }
}

impl TurnkeyConfig {
    /// Compiled placeholder family for `kind`, or `None` when the kind has
    /// no family or the family was not configured.
    pub fn family_for(&self, kind: TargetKind) -> Result<Option<PlaceholderFamily>, ScaffoldError> {
        let Some(key) = kind.family_key() else {
            return Ok(None);
        };
        self.families
            .get(key)
            .map(|family| family.compile(key))
            .transpose()
    }

    /// Check that every family compiles.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, family) in &self.families {
            family.compile(key)?;
        }
        for kind in TargetKind::ALL {
            let dir = self.paths.dir_for(kind);
            if dir.trim().is_empty() {
                anyhow::bail!("Directory for {} targets must not be empty", kind);
            }
        }
        Ok(())
    }
}
