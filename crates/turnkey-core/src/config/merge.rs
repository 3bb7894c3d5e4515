//! Layering of configuration files onto the built-in defaults.

use super::schema::{ConfigLayer, TurnkeyConfig};

/// Apply `layers` in order (global first, project last) onto the defaults.
///
/// Directory names override field by field; families replace whole entries
/// by key.
pub fn merge_layers<'a, I>(layers: I) -> TurnkeyConfig
where
    I: IntoIterator<Item = &'a ConfigLayer>,
{
    let mut config = TurnkeyConfig::default();
    for layer in layers {
        apply_layer(&mut config, layer);
    }
    config
}

fn apply_layer(config: &mut TurnkeyConfig, layer: &ConfigLayer) {
    let paths = &layer.paths;
    if let Some(dir) = &paths.docker {
        config.paths.docker = dir.clone();
    }
    if let Some(dir) = &paths.kubernetes {
        config.paths.kubernetes = dir.clone();
    }
    if let Some(dir) = &paths.ansible {
        config.paths.ansible = dir.clone();
    }
    if let Some(dir) = &paths.terraform {
        config.paths.terraform = dir.clone();
    }

    for (key, family) in &layer.families {
        config.families.insert(key.clone(), family.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{FamilyConfig, PathsLayer};
    use crate::scaffold::SettingsFormat;

    #[test]
    fn no_layers_yields_defaults() {
        assert_eq!(merge_layers([]), TurnkeyConfig::default());
    }

    #[test]
    fn project_overrides_global_per_field() {
        let global = ConfigLayer {
            paths: PathsLayer {
                docker: Some("compose".to_string()),
                terraform: Some("infra".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let project = ConfigLayer {
            paths: PathsLayer {
                docker: Some("apps".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let config = merge_layers([&global, &project]);

        assert_eq!(config.paths.docker, "apps");
        assert_eq!(config.paths.terraform, "infra");
        assert_eq!(config.paths.ansible, "ansible");
    }

    #[test]
    fn family_replaces_builtin_by_key() {
        let mut layer = ConfigLayer::default();
        layer.families.insert(
            "compose".to_string(),
            FamilyConfig {
                pattern: r"\$([A-Z]+)".to_string(),
                settings_file: "app.env".to_string(),
                format: SettingsFormat::Env,
                ignore: vec![],
                ignore_prefixes: vec![],
            },
        );

        let config = merge_layers([&layer]);

        assert_eq!(config.families["compose"].settings_file, "app.env");
        assert_eq!(config.families["terraform"].settings_file, "terraform.tfvars");
    }
}
