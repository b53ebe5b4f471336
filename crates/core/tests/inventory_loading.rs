use std::fs;

use rackdiff_core::inventory::{
    fingerprint, short_fingerprint, DocumentFormat, Inventory, InventoryError, InventoryWarning,
};
use rackdiff_core::model::{ComponentVariant, Server};
use tempfile::tempdir;

const JSON_INVENTORY: &str = r#"[
  {
    "name": "qa1",
    "components": [
      { "url": "u", "name": "Device 1", "pid": "PID001", "version": "1.0.0", "commit": "abc123",
        "packageDependencies": [{ "name": "dep1", "commit": "def456" }],
        "binaryDependencies": [] },
      { "url": "u", "name": "Common 1", "version": "1.1.0", "commit": "pqr678",
        "dependencies": ["dep4", "dep5"], "files": ["config.json"] }
    ]
  },
  { "name": "prod", "components": [] }
]"#;

const YAML_INVENTORY: &str = r#"
servers:
  - name: qa1
    components:
      - url: u
        name: Common 1
        version: 1.1.0
        commit: pqr678
        dependencies: [dep4]
        files: [config.json, data.json]
  - name: QA2
"#;

#[test]
fn loads_json_array_from_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("servers.json");
    fs::write(&path, JSON_INVENTORY).expect("write inventory");

    let inventory = Inventory::from_path(&path).expect("load");
    assert_eq!(inventory.names(), vec!["qa1", "prod"]);
    let qa1 = inventory.server("qa1").expect("qa1");
    assert_eq!(qa1.components[0].variant(), ComponentVariant::Device);
    assert_eq!(qa1.components[1].variant(), ComponentVariant::Common);
}

#[test]
fn loads_wrapped_yaml_from_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("servers.yaml");
    fs::write(&path, YAML_INVENTORY).expect("write inventory");

    let inventory = Inventory::from_path(&path).expect("load");
    assert_eq!(inventory.len(), 2);
    assert!(inventory.server("QA2").expect("QA2").components.is_empty());
}

#[test]
fn filter_matches_case_insensitively() {
    let inventory = Inventory::parse(YAML_INVENTORY, DocumentFormat::Yaml).expect("parse");
    let names: Vec<&str> = inventory.filter("qa").iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["qa1", "QA2"]);
    assert_eq!(inventory.filter("").len(), 2);
    assert!(inventory.filter("prod").is_empty());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("servers.toml");
    fs::write(&path, "").expect("write");
    let err = Inventory::from_path(&path).unwrap_err();
    assert!(matches!(err, InventoryError::UnsupportedFormat(ref ext) if ext == "toml"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = Inventory::from_path(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, InventoryError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Inventory::parse("{ not json", DocumentFormat::Json).unwrap_err();
    assert!(matches!(err, InventoryError::Json(_)));
}

#[test]
fn validate_reports_duplicates_at_every_level() {
    let body = r#"[
      { "name": "qa1", "components": [
        { "url": "u", "name": "C", "version": "1", "commit": "c",
          "dependencies": ["dep4", "dep4"], "files": ["a", "a"] },
        { "url": "u", "name": "C", "version": "1", "commit": "c" },
        { "url": "u", "name": "D", "pid": "P", "version": "1", "commit": "c",
          "packageDependencies": [{ "name": "p", "commit": "1" }, { "name": "p", "commit": "2" }] }
      ] },
      { "name": "qa1" }
    ]"#;
    let inventory = Inventory::parse(body, DocumentFormat::Json).expect("parse");

    let warnings = inventory.validate();
    assert!(warnings.contains(&InventoryWarning::DuplicateServer { server: "qa1".to_string() }));
    assert!(warnings.contains(&InventoryWarning::DuplicateComponent {
        server: "qa1".to_string(),
        component: "C".to_string(),
    }));
    assert!(warnings.contains(&InventoryWarning::DuplicateDependency {
        server: "qa1".to_string(),
        component: "C".to_string(),
        dependency: "dep4".to_string(),
    }));
    assert!(warnings.contains(&InventoryWarning::DuplicateFile {
        server: "qa1".to_string(),
        component: "C".to_string(),
        file: "a".to_string(),
    }));
    assert!(warnings.contains(&InventoryWarning::DuplicateDependency {
        server: "qa1".to_string(),
        component: "D".to_string(),
        dependency: "p".to_string(),
    }));
    assert_eq!(warnings.len(), 5);
}

#[test]
fn clean_inventory_has_no_warnings() {
    let inventory = Inventory::parse(JSON_INVENTORY, DocumentFormat::Json).expect("parse");
    assert!(inventory.validate().is_empty());
}

#[test]
fn fingerprint_tracks_document_content() {
    let a = Server::new("qa1");
    let b = Server::new("qa1");
    let c = Server::new("prod");

    let fa = fingerprint(&a).expect("fingerprint");
    assert_eq!(fa.len(), 64);
    assert_eq!(fa, fingerprint(&b).expect("fingerprint"));
    assert_ne!(fa, fingerprint(&c).expect("fingerprint"));
    assert_eq!(short_fingerprint(&fa).len(), 12);
    assert_eq!(short_fingerprint("abc"), "abc");
}
