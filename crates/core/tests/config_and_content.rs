use std::fs;

use rackdiff_core::diff::{DiffMode, ViewMode};
use rackdiff_core::inventory::{
    ConfigError, ContentError, DashboardConfig, DirectoryContent, FileContentProvider,
    PlaceholderContent,
};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    assert!(DashboardConfig::discover(dir.path()).expect("discover").is_none());

    let config = DashboardConfig::default();
    assert_eq!(config.diff_mode, DiffMode::Split);
    assert_eq!(config.view_mode, ViewMode::Interactive);
    assert!(config.inventory_path().ends_with("servers.json"));
    assert!(config.files_dir_path().is_none());
}

#[test]
fn discovers_json_config_and_resolves_relative_paths() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("rackdiff.json"),
        r#"{ "inventory": "data/servers.yaml", "diff_mode": "unified", "files_dir": "files" }"#,
    )
    .expect("write config");

    let config = DashboardConfig::discover(dir.path()).expect("discover").expect("config present");
    assert_eq!(config.diff_mode, DiffMode::Unified);
    assert_eq!(config.view_mode, ViewMode::Interactive);
    assert_eq!(config.inventory_path(), dir.path().join("data/servers.yaml"));
    assert_eq!(config.files_dir_path(), Some(dir.path().join("files")));
}

#[test]
fn loads_yaml_config_with_absolute_inventory() {
    let dir = tempdir().expect("tempdir");
    let inventory = dir.path().join("elsewhere.json");
    let path = dir.path().join("rackdiff.yml");
    fs::write(&path, format!("inventory: {}\nview_mode: text\n", inventory.display()))
        .expect("write config");

    let config = DashboardConfig::load(&path).expect("load");
    assert_eq!(config.view_mode, ViewMode::Text);
    assert_eq!(config.inventory_path(), inventory);
}

#[test]
fn invalid_config_values_are_parse_errors() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("rackdiff.json");
    fs::write(&path, r#"{ "diff_mode": "sideways" }"#).expect("write config");
    let err = DashboardConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn placeholder_returns_sample_document() {
    let value = PlaceholderContent.content("anything.json").expect("content");
    assert_eq!(value["key2"]["nestedKey"], "nestedValue");
    assert_eq!(value["key3"], json!([1, 2, 3]));
}

#[test]
fn directory_content_reads_json_yaml_and_text() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("config.json"), r#"{"port": 8080}"#).expect("write json");
    fs::write(dir.path().join("settings.yaml"), "debug: true\n").expect("write yaml");
    fs::write(dir.path().join("notes.txt"), "hello").expect("write txt");

    let provider = DirectoryContent::new(dir.path());
    assert_eq!(provider.content("config.json").expect("json"), json!({"port": 8080}));
    assert_eq!(provider.content("settings.yaml").expect("yaml"), json!({"debug": true}));
    assert_eq!(provider.content("notes.txt").expect("text"), json!("hello"));
}

#[test]
fn directory_content_falls_back_to_placeholder_for_missing_files() {
    let dir = tempdir().expect("tempdir");
    let provider = DirectoryContent::new(dir.path());
    let value = provider.content("data.json").expect("fallback");
    assert_eq!(value, PlaceholderContent.content("data.json").expect("placeholder"));
}

#[test]
fn directory_content_rejects_escaping_names() {
    let dir = tempdir().expect("tempdir");
    let provider = DirectoryContent::new(dir.path());
    for name in ["../secret.json", "", "/etc/passwd"] {
        let err = provider.content(name).unwrap_err();
        assert!(matches!(err, ContentError::InvalidName(_)), "{name}: {err}");
    }
}

#[test]
fn directory_content_reports_malformed_json() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("broken.json"), "{").expect("write");
    let err = DirectoryContent::new(dir.path()).content("broken.json").unwrap_err();
    assert!(matches!(err, ContentError::Parse { .. }));
}
