//! Integration tests for directory aggregation.
//!
//! Exercises discovery, loading and merging together through the public API:
//! - aggregate() / aggregate_sources() - fold files in path order
//! - ConfigLoader - the same through the builder

use confstack::config::{aggregate, aggregate_sources, discover};
use confstack::{ConfigError, ConfigLoader, ConfigValue, FormatSet, FormatTag};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).expect("Failed to create config dir");
    fs::write(dir.join(name), content).expect("Failed to write config file");
}

fn as_value(document: confstack::ConfigDocument) -> ConfigValue {
    ConfigValue::Mapping(document)
}

#[test]
fn test_later_path_wins_on_conflict() {
    let temp = TempDir::new().unwrap();
    // Written in reverse order so creation order cannot explain the result
    write(temp.path(), "b.yaml", "key: from-b\n");
    write(temp.path(), "a.yaml", "key: from-a\nonly_a: 1\n");

    let merged = aggregate(temp.path(), &FormatSet::default()).unwrap();
    assert_eq!(as_value(merged), ConfigValue::from(json!({"key": "from-b", "only_a": 1})));
}

#[test]
fn test_formats_mix_in_path_order() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "10-base.yaml",
        r#"
server:
  host: localhost
  port: 8080
  allowed: [a, b]
logging:
  level: info
"#,
    );
    write(
        temp.path(),
        "20-env.toml",
        r#"
[server]
port = 9000
allowed = ["c"]
"#,
    );
    write(
        temp.path(),
        "30-local.json",
        r#"{"logging": {"level": "debug", "file": null}}"#,
    );

    let merged = aggregate(temp.path(), &FormatSet::default()).unwrap();
    assert_eq!(
        as_value(merged),
        ConfigValue::from(json!({
            "server": {"host": "localhost", "port": 9000, "allowed": ["c"]},
            "logging": {"level": "debug", "file": null}
        }))
    );
}

#[test]
fn test_null_and_type_mismatch_override() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.json", r#"{"cache": {"size": 10}, "name": {"first": "x"}}"#);
    write(temp.path(), "b.json", r#"{"cache": null, "name": "plain"}"#);

    let merged = aggregate(temp.path(), &FormatSet::default()).unwrap();
    assert_eq!(as_value(merged), ConfigValue::from(json!({"cache": null, "name": "plain"})));
}

#[test]
fn test_multiple_directories() {
    let temp = TempDir::new().unwrap();
    let defaults = temp.path().join("a-defaults");
    let overrides = temp.path().join("b-overrides");
    write(&defaults, "app.yaml", "db:\n  host: db.internal\n  pool: 5\n");
    write(&overrides, "app.yaml", "db:\n  pool: 20\n");

    // Input order is irrelevant; full paths decide
    let merged = aggregate(
        vec![overrides.clone(), defaults.clone()],
        &FormatSet::default(),
    )
    .unwrap();
    assert_eq!(
        as_value(merged),
        ConfigValue::from(json!({"db": {"host": "db.internal", "pool": 20}}))
    );
}

#[test]
fn test_missing_directory_aggregates_to_empty() {
    let temp = TempDir::new().unwrap();
    let merged = aggregate(temp.path().join("nowhere"), &FormatSet::all()).unwrap();
    assert!(merged.is_empty());
}

#[test]
fn test_empty_directory_aggregates_to_empty() {
    let temp = TempDir::new().unwrap();
    let merged = aggregate(temp.path(), &FormatSet::all()).unwrap();
    assert!(merged.is_empty());
}

#[test]
fn test_ini_requires_opt_in() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.yaml", "server:\n  port: 80\n");
    write(temp.path(), "b.ini", "[server]\nport = 8080\n");
    write(temp.path(), "c.cfg", "[client]\nretries = 3\n");

    let merged = aggregate(temp.path(), &FormatSet::default()).unwrap();
    assert_eq!(as_value(merged), ConfigValue::from(json!({"server": {"port": 80}})));

    let formats = FormatSet::from([FormatTag::Yaml, FormatTag::Ini]);
    let merged = aggregate(temp.path(), &formats).unwrap();
    assert_eq!(
        as_value(merged),
        ConfigValue::from(json!({
            "server": {"port": "8080"},
            "client": {"retries": "3"}
        }))
    );
}

#[test]
fn test_malformed_file_aborts_aggregation() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.yaml", "good: true\n");
    write(temp.path(), "b.yaml", "bad: [unclosed\n");
    write(temp.path(), "c.yaml", "also_good: true\n");

    let err = aggregate(temp.path(), &FormatSet::default()).unwrap_err();
    match err {
        ConfigError::Decode { path, format, .. } => {
            assert_eq!(path, temp.path().join("b.yaml"));
            assert_eq!(format, FormatTag::Yaml);
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_ini_structural_error_aborts_aggregation() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.ini", "orphan = 1\n");

    let err = aggregate(temp.path(), &FormatSet::from(FormatTag::Ini)).unwrap_err();
    assert!(matches!(err, ConfigError::Decode { format: FormatTag::Ini, .. }));
}

#[test]
fn test_aggregate_sources_uses_given_order() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.yaml", "v: 1\n");
    write(temp.path(), "b.yaml", "v: 2\n");

    let sources = discover(temp.path(), &FormatSet::default()).unwrap();
    assert_eq!(sources.len(), 2);
    let merged = aggregate_sources(&sources).unwrap();
    assert_eq!(merged.get("v"), Some(&ConfigValue::Integer(2)));
}

#[test]
fn test_aggregation_is_repeatable() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "x.yaml", "a: {b: 1}\n");
    write(temp.path(), "y.json", r#"{"a": {"c": 2}}"#);
    write(temp.path(), "z.toml", "[a]\nb = 3\n");

    let first = aggregate(temp.path(), &FormatSet::default()).unwrap();
    let second = aggregate(temp.path(), &FormatSet::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(as_value(first), ConfigValue::from(json!({"a": {"b": 3, "c": 2}})));
}

#[test]
fn test_config_loader_builder() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "main.yml", "name: svc\n");
    write(temp.path(), "extra.cfg", "[extra]\nflag = on\n");

    let loader = ConfigLoader::new(temp.path()).with_formats(FormatSet::all());
    assert!(loader.formats().contains(FormatTag::Ini));

    let merged = loader.load().unwrap();
    assert_eq!(
        as_value(merged),
        ConfigValue::from(json!({"name": "svc", "extra": {"flag": "on"}}))
    );
}
