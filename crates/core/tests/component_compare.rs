use rackdiff_core::compare::{
    compare_components, CompareError, ComponentField, DependencyDiff, DiffStatus, MissingSide,
};
use rackdiff_core::model::{
    BinaryDependency, Component, ComponentKind, ComponentVariant, PackageDependency,
};

fn device(version: &str) -> Component {
    Component::new(
        "Device 1",
        ComponentKind::Device {
            pid: "PID001".to_string(),
            package_dependencies: vec![
                PackageDependency::new("dep1", "def456"),
                PackageDependency::new("dep2", "ghi789"),
            ],
            binary_dependencies: vec![BinaryDependency::new("bin1", "2.0.0")],
        },
    )
    .with_url("https://example.com/device1")
    .with_version(version)
    .with_commit("abc123")
}

fn common(files: &[&str]) -> Component {
    Component::new(
        "Common 1",
        ComponentKind::Common {
            dependencies: vec!["dep4".into(), "dep5".into()],
            files: files.iter().map(|f| f.to_string()).collect(),
        },
    )
    .with_version("1.1.0")
    .with_commit("pqr678")
}

#[test]
fn devices_differing_only_in_version_flag_only_version() {
    let left = device("1.0.0");
    let right = device("2.0.0");

    let diff = compare_components(Some(&left), Some(&right)).expect("comparable");

    assert_eq!(diff.variant, ComponentVariant::Device);
    assert_eq!(diff.changed_fields(), vec![ComponentField::Version]);
    let version = diff.field(ComponentField::Version).expect("version field");
    assert_eq!(version.before, "1.0.0");
    assert_eq!(version.after, "2.0.0");
    assert!(!diff.dependencies.has_changes());
    assert!(diff.has_changes());
}

#[test]
fn device_diff_includes_pid_field() {
    let left = device("1.0.0");
    let diff = compare_components(Some(&left), Some(&left)).expect("comparable");
    let pid = diff.field(ComponentField::Pid).expect("pid field");
    assert_eq!(pid.before, "PID001");
    assert!(!pid.is_different);
    assert!(!diff.has_changes());
}

#[test]
fn device_dependencies_reconcile_by_commit_and_version() {
    let left = device("1.0.0");
    let mut right = device("1.0.0");
    right.kind = ComponentKind::Device {
        pid: "PID001".to_string(),
        package_dependencies: vec![
            PackageDependency::new("dep1", "vwx234"),
            PackageDependency::new("dep2", "ghi789"),
        ],
        binary_dependencies: vec![
            BinaryDependency::new("bin1", "2.5.0"),
            BinaryDependency::new("bin9", "1.0.0"),
        ],
    };

    let diff = compare_components(Some(&left), Some(&right)).expect("comparable");
    match &diff.dependencies {
        DependencyDiff::Device { package_dependencies, binary_dependencies } => {
            assert_eq!(package_dependencies.keys_with(DiffStatus::Changed), vec!["dep1"]);
            assert_eq!(package_dependencies.keys_with(DiffStatus::Unchanged), vec!["dep2"]);
            assert_eq!(binary_dependencies.keys_with(DiffStatus::Changed), vec!["bin1"]);
            assert_eq!(binary_dependencies.keys_with(DiffStatus::Added), vec!["bin9"]);
        }
        other => panic!("expected device dependencies, got {other:?}"),
    }
    assert!(diff.changed_fields().is_empty());
    assert!(diff.has_changes());
}

#[test]
fn common_files_are_membership_diffed() {
    let left = common(&["a", "b"]);
    let right = common(&["b", "c"]);

    let diff = compare_components(Some(&left), Some(&right)).expect("comparable");
    assert!(diff.field(ComponentField::Pid).is_none());
    match &diff.dependencies {
        DependencyDiff::Common { dependencies, files } => {
            assert!(!dependencies.has_changes());
            assert_eq!(files.keys_with(DiffStatus::Removed), vec!["a"]);
            assert_eq!(files.keys_with(DiffStatus::Unchanged), vec!["b"]);
            assert_eq!(files.keys_with(DiffStatus::Added), vec!["c"]);
        }
        other => panic!("expected common dependencies, got {other:?}"),
    }
}

#[test]
fn missing_components_are_reported_per_side() {
    let present = device("1.0.0");

    assert_eq!(
        compare_components(None, Some(&present)),
        Err(CompareError::MissingComponent { side: MissingSide::Left })
    );
    assert_eq!(
        compare_components(Some(&present), None),
        Err(CompareError::MissingComponent { side: MissingSide::Right })
    );
    let err = compare_components(None, None).unwrap_err();
    assert_eq!(err, CompareError::MissingComponent { side: MissingSide::Both });
    assert!(err.to_string().contains("unable to compare"));
}

#[test]
fn device_against_common_is_a_variant_mismatch() {
    let left = device("1.0.0");
    let mut right = common(&[]);
    right.name = left.name.clone();

    let err = compare_components(Some(&left), Some(&right)).unwrap_err();
    assert_eq!(
        err,
        CompareError::VariantMismatch {
            name: "Device 1".to_string(),
            left: ComponentVariant::Device,
            right: ComponentVariant::Common,
        }
    );
    assert!(err.to_string().contains("device component on the left"));
}
