//! Integration tests for settings scaffolding against real files.

mod support;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use turnkey_core::config::FamilyConfig;
use turnkey_core::scaffold::{
    Classifier, PlaceholderFamily, ScaffoldError, ScaffoldOutcome, SkipReason, generate,
    generate_for_sources,
};

use support::write;

fn family(key: &str) -> PlaceholderFamily {
    FamilyConfig::builtin(key)
        .expect("builtin family")
        .compile(key)
        .expect("builtin family should compile")
}

fn compose_target(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("widgets").join("compose.yaml");
    write(&config, content);
    (temp, config)
}

/// Non-comment, non-blank lines of a generated file.
fn body_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read settings")
        .lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#') && *l != "---")
        .map(str::to_string)
        .collect()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn generates_target_derived_and_secret_values_in_order() {
    let (_temp, config) =
        compose_target("environment:\n  - P=${APP_PASSWORD}\n  - D=${APP_DATABASE}\n");

    let outcome = generate("widgets", &config, &family("compose")).expect("generate");
    let written = outcome.written().expect("file should be written");
    assert_eq!(written.variable_count, 2);
    assert_eq!(written.path, config.parent().unwrap().join(".env"));

    let lines = body_lines(&written.path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "APP_DATABASE=widgets_database");

    let secret = lines[1]
        .strip_prefix("APP_PASSWORD=")
        .expect("password line second");
    assert_eq!(secret.len(), 24);
    assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn unrecognized_names_get_the_default_value() {
    let (_temp, config) = compose_target("command: run --log ${LOG_LEVEL}\n");

    let outcome = generate("widgets", &config, &family("compose")).expect("generate");
    let path = &outcome.written().expect("written").path;
    assert_eq!(body_lines(path), vec!["LOG_LEVEL=changeme".to_string()]);
}

#[test]
fn header_names_the_target_and_warns_about_placeholders() {
    let (_temp, config) = compose_target("image: ${IMAGE}\n");

    let outcome = generate("widgets", &config, &family("compose")).expect("generate");
    let content = fs::read_to_string(&outcome.written().unwrap().path).unwrap();
    let header: Vec<_> = content.lines().take_while(|l| l.starts_with('#')).collect();
    assert!(header[0].contains("'widgets'"));
    assert!(header.iter().any(|l| l.contains("placeholders")));
    assert!(header.iter().any(|l| l.contains("Generated by turnkey at")));
}

#[test]
fn second_generate_is_skipped_and_leaves_file_unchanged() {
    let (_temp, config) = compose_target("a: ${API_TOKEN}\nb: ${DB_HOST}\n");
    let family = family("compose");

    let first = generate("widgets", &config, &family).expect("first generate");
    let path = first.written().expect("written").path.clone();
    let before = fs::read(&path).unwrap();

    let second = generate("widgets", &config, &family).expect("second generate");
    assert_eq!(
        second,
        ScaffoldOutcome::Skipped {
            reason: SkipReason::AlreadyExists(path.clone())
        }
    );
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn existing_destination_is_never_overwritten() {
    let (_temp, config) = compose_target("password: ${APP_PASSWORD}\n");
    let env = config.parent().unwrap().join(".env");
    fs::write(&env, "FOO=bar").unwrap();

    let outcome = generate("widgets", &config, &family("compose")).expect("generate");
    assert!(outcome.is_skipped());
    assert_eq!(fs::read_to_string(&env).unwrap(), "FOO=bar");
}

#[test]
fn every_scanned_name_gets_exactly_one_line() {
    let content = "\
x: ${B_VALUE}
y: ${A_VALUE}
z: ${B_VALUE}
w: ${ADMIN_EMAIL}
lower: ${lower_case}
";
    let (_temp, config) = compose_target(content);
    let family = family("compose");
    let scanned = family.scan(content);

    let outcome = generate("widgets", &config, &family).expect("generate");
    let lines = body_lines(&outcome.written().unwrap().path);
    let names: Vec<_> = lines
        .iter()
        .map(|l| l.split_once('=').expect("KEY=VALUE").0.to_string())
        .collect();

    assert_eq!(names, scanned.into_iter().collect::<Vec<_>>());
    assert_eq!(names, vec!["ADMIN_EMAIL", "A_VALUE", "B_VALUE"]);
}

#[test]
fn compose_names_with_inline_defaults_are_left_out() {
    let (_temp, config) = compose_target(
        "command: serve --log ${LOG_LEVEL:-info} --port ${HTTP_PORT:-3000}\n\
         environment:\n  - PRICE=$${AMOUNT}\n  - KEY=${API_TOKEN}\n",
    );

    let outcome = generate("widgets", &config, &family("compose")).expect("generate");
    let written = outcome.written().expect("written");
    assert_eq!(written.variable_count, 1);
    let lines = body_lines(&written.path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("API_TOKEN="));
}

#[test]
fn compose_file_with_only_defaults_is_skipped() {
    let (_temp, config) = compose_target("image: app:${TAG:-latest}\n");

    let outcome = generate("widgets", &config, &family("compose")).expect("generate");
    assert_eq!(
        outcome,
        ScaffoldOutcome::Skipped {
            reason: SkipReason::NoPlaceholders
        }
    );
}

#[test]
fn terraform_variables_with_defaults_keep_their_defaults() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cluster");
    write(
        &dir.join("variables.tf"),
        r#"
variable "enabled" {
  type    = bool
  default = true
}

variable "instance_count" { type = number  default = 2 }

variable "cluster_name" {
  type = string
}
"#,
    );

    let outcome = generate_for_sources(
        "cluster",
        &[dir.join("variables.tf")],
        &dir,
        &family("terraform"),
    )
    .expect("generate");
    let lines = body_lines(&outcome.written().expect("written").path);
    assert_eq!(lines, vec!["cluster_name = \"changeme\"".to_string()]);
}

#[test]
fn non_secret_classification_is_deterministic() {
    let classifier = Classifier::new("widgets");
    for name in ["DB_HOST", "APP_PORT", "DB_USER", "APP_DATABASE", "ADMIN_EMAIL", "SITE_URL", "LOG_LEVEL"] {
        assert_eq!(classifier.classify(name), classifier.classify(name), "{name}");
    }
}

#[test]
fn file_without_placeholders_is_skipped_without_writing() {
    let (_temp, config) = compose_target("services:\n  web:\n    image: nginx\n");
    let dir = config.parent().unwrap().to_path_buf();

    let outcome = generate("widgets", &config, &family("compose")).expect("generate");
    assert_eq!(
        outcome,
        ScaffoldOutcome::Skipped {
            reason: SkipReason::NoPlaceholders
        }
    );
    assert_eq!(dir_entries(&dir), vec!["compose.yaml"]);
}

#[test]
fn missing_configuration_fails_without_touching_disk() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("ghost").join("compose.yaml");

    let err = generate("ghost", &config, &family("compose")).expect_err("should fail");
    assert!(matches!(err, ScaffoldError::NotFound(ref p) if p == &config));
    assert!(dir_entries(temp.path()).is_empty());
}

#[test]
fn terraform_sources_are_merged_into_one_tfvars_file() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("network");
    write(&dir.join("main.tf"), "variable \"region\" {}\nvariable \"db_password\" {}\n");
    write(&dir.join("dns.tf"), "variable \"domain\" {\n  type = string\n}\n");

    let sources = vec![dir.join("dns.tf"), dir.join("main.tf")];
    let outcome =
        generate_for_sources("network", &sources, &dir, &family("terraform")).expect("generate");
    let written = outcome.written().expect("written");
    assert_eq!(written.path, dir.join("terraform.tfvars"));
    assert_eq!(written.variable_count, 3);

    let lines = body_lines(&written.path);
    let secret = lines[0]
        .strip_prefix("db_password = \"")
        .and_then(|rest| rest.strip_suffix('"'))
        .expect("db_password line first");
    assert_eq!(secret.len(), 24);
    assert_eq!(lines[1], "domain = \"https://example.com\"");
    assert_eq!(lines[2], "region = \"changeme\"");
}

#[test]
fn ansible_playbook_produces_yaml_secrets_without_facts_or_builtin_variables() {
    let temp = TempDir::new().unwrap();
    let playbook = temp.path().join("site.yaml");
    write(
        &playbook,
        "- hosts: all\n  tasks:\n    - debug: msg=\"{{ admin_email }} {{ item }} on {{ ansible_hostname }} ({{ ansible_distribution }}) in {{ group_names }}\"\n      loop: \"{{ users | default([]) }}\"\n",
    );

    let outcome = generate("site", &playbook, &family("ansible")).expect("generate");
    let written = outcome.written().expect("written");
    assert_eq!(written.path, temp.path().join("secrets.yaml"));

    let content = fs::read_to_string(&written.path).unwrap();
    assert!(content.contains("---\n"));
    assert_eq!(
        body_lines(&written.path),
        vec![
            "admin_email: \"admin@example.com\"".to_string(),
            "users: \"site_user\"".to_string(),
        ]
    );
}

#[test]
fn no_temporary_files_are_left_behind() {
    let (_temp, config) = compose_target("x: ${SECRET_KEY}\n");
    let dir = config.parent().unwrap().to_path_buf();

    generate("widgets", &config, &family("compose")).expect("generate");
    assert_eq!(dir_entries(&dir), vec![".env", "compose.yaml"]);
}
