//! Integration tests for layered configuration loading.

mod support;

use tempfile::TempDir;
use turnkey_core::config::{ConfigStore, TurnkeyConfig};
use turnkey_core::context::AppContext;
use turnkey_core::scaffold::SettingsFormat;
use turnkey_core::types::TargetKind;

use support::write;

#[test]
fn no_files_yields_defaults() {
    let global = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();

    let config = ConfigStore::from_paths(Some(global.path()), root.path())
        .load()
        .expect("load");
    assert_eq!(config, TurnkeyConfig::default());
}

#[test]
fn project_layer_overrides_global_layer() {
    let global = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write(
        &global.path().join("turnkey.toml"),
        "[paths]\ndocker = \"stacks\"\nterraform = \"infra\"\n",
    );
    write(
        &root.path().join("turnkey.toml"),
        r#"
[paths]
terraform = "tf"

[families.compose]
pattern = '\$\{([A-Z_][A-Z0-9_]*)\}'
settings_file = "stack.env"
"#,
    );

    let store = ConfigStore::from_paths(Some(global.path()), root.path());
    assert_eq!(store.project_path(), root.path().join("turnkey.toml"));
    let config = store.load().expect("load");

    assert_eq!(config.paths.docker, "stacks");
    assert_eq!(config.paths.terraform, "tf");
    assert_eq!(config.paths.ansible, "ansible");

    let compose = &config.families["compose"];
    assert_eq!(compose.settings_file, "stack.env");
    assert_eq!(compose.format, SettingsFormat::Env);
    // Untouched built-ins survive.
    assert_eq!(config.families["terraform"].settings_file, "terraform.tfvars");
}

#[test]
fn invalid_pattern_is_rejected_at_load() {
    let root = TempDir::new().unwrap();
    write(
        &root.path().join("turnkey.toml"),
        "[families.compose]\npattern = \"no-group\"\nsettings_file = \".env\"\n",
    );

    let err = ConfigStore::from_paths(None, root.path())
        .load()
        .expect_err("pattern without a capture group");
    assert!(format!("{err:#}").contains("Invalid turnkey configuration"));
}

#[test]
fn unknown_keys_report_the_file() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("turnkey.toml"), "[paths]\nhelm = \"charts\"\n");

    let err = ConfigStore::from_paths(None, root.path())
        .load()
        .expect_err("unknown field");
    assert!(format!("{err:#}").contains("turnkey.toml"));
}

#[test]
fn context_uses_project_configuration() {
    let root = TempDir::new().unwrap();
    write(
        &root.path().join("turnkey.toml"),
        "[families.ansible]\npattern = '\\{\\{\\s*(\\w+)'\nsettings_file = \"vars.yaml\"\nformat = \"yaml\"\n",
    );

    let ctx = AppContext::new(
        root.path().to_path_buf(),
        ConfigStore::from_paths(None, root.path()).load().unwrap(),
    );
    let family = ctx
        .family_for(TargetKind::Ansible)
        .unwrap()
        .expect("ansible family");
    assert_eq!(family.settings_path(root.path()), root.path().join("vars.yaml"));
    assert!(ctx.family_for(TargetKind::Kubernetes).unwrap().is_none());
}
