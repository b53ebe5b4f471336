use rackdiff_core::compare::{reconcile, CompareField, DiffStatus, Side};
use rackdiff_core::model::{BinaryDependency, Dependency, PackageDependency};

fn pkg(name: &str, commit: &str) -> PackageDependency {
    PackageDependency::new(name, commit)
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn package_dependency_changes_and_additions() {
    let left = vec![pkg("dep1", "abc")];
    let right = vec![pkg("dep1", "xyz"), pkg("dep2", "111")];

    let result = reconcile(&left, &right, CompareField::Commit);

    let dep1 = result.get("dep1").expect("dep1 entry");
    assert_eq!(dep1.status, DiffStatus::Changed);
    assert_eq!(dep1.before.as_deref(), Some("abc"));
    assert_eq!(dep1.after.as_deref(), Some("xyz"));

    let dep2 = result.get("dep2").expect("dep2 entry");
    assert_eq!(dep2.status, DiffStatus::Added);
    assert_eq!(dep2.before, None);
    assert_eq!(dep2.after.as_deref(), Some("111"));

    assert_eq!(result.entries.len(), 2);
}

#[test]
fn disjoint_names_partition_into_removed_and_added() {
    let left = vec![pkg("a", "1"), pkg("b", "2")];
    let right = vec![pkg("c", "3"), pkg("d", "4")];

    let result = reconcile(&left, &right, CompareField::Commit);

    assert_eq!(result.keys_with(DiffStatus::Removed), vec!["a", "b"]);
    assert_eq!(result.keys_with(DiffStatus::Added), vec!["c", "d"]);
    assert_eq!(result.changed().count(), 0);
    assert_eq!(result.unchanged().count(), 0);
}

#[test]
fn output_is_left_order_then_right_only_in_right_order() {
    let left = vec![pkg("z", "1"), pkg("m", "1"), pkg("a", "1")];
    let right = vec![pkg("q", "1"), pkg("a", "2"), pkg("b", "1"), pkg("z", "1")];

    let result = reconcile(&left, &right, CompareField::Commit);
    let keys: Vec<&str> = result.entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["z", "m", "a", "q", "b"]);

    let again = reconcile(&left, &right, CompareField::Commit);
    assert_eq!(result, again);
}

#[test]
fn identical_inputs_are_all_unchanged() {
    let deps = vec![pkg("dep1", "abc"), pkg("dep2", "def")];
    let result = reconcile(&deps, &deps, CompareField::Commit);
    assert!(!result.has_changes());
    assert_eq!(result.counts().unchanged, 2);
    assert_eq!(result.counts().differences(), 0);
}

#[test]
fn swapping_sides_swaps_added_and_removed() {
    let x = vec![pkg("a", "1"), pkg("b", "1"), pkg("c", "1")];
    let y = vec![pkg("b", "2"), pkg("c", "1"), pkg("d", "1")];

    let forward = reconcile(&x, &y, CompareField::Commit);
    let backward = reconcile(&y, &x, CompareField::Commit);

    assert_eq!(forward.keys_with(DiffStatus::Added), backward.keys_with(DiffStatus::Removed));
    assert_eq!(forward.keys_with(DiffStatus::Removed), backward.keys_with(DiffStatus::Added));
    assert_eq!(forward.keys_with(DiffStatus::Changed), vec!["b"]);
    assert_eq!(backward.keys_with(DiffStatus::Changed), vec!["b"]);
}

#[test]
fn binary_dependencies_compare_by_version() {
    let left = vec![BinaryDependency::new("bin1", "2.0.0"), BinaryDependency::new("bin2", "3.1.0")];
    let right = vec![BinaryDependency::new("bin1", "2.5.0"), BinaryDependency::new("bin2", "3.1.0")];

    let result = reconcile(&left, &right, CompareField::Version);
    assert_eq!(result.keys_with(DiffStatus::Changed), vec!["bin1"]);
    assert_eq!(result.keys_with(DiffStatus::Unchanged), vec!["bin2"]);
}

#[test]
fn missing_compared_field_counts_as_different() {
    // Package dependencies carry no version.
    let deps = vec![pkg("dep1", "abc")];
    let result = reconcile(&deps, &deps, CompareField::Version);
    assert_eq!(result.keys_with(DiffStatus::Changed), vec!["dep1"]);
}

#[test]
fn file_membership_diff() {
    let left = names(&["a", "b"]);
    let right = names(&["b", "c"]);

    let result = reconcile(&left, &right, CompareField::Auto);

    assert_eq!(result.keys_with(DiffStatus::Removed), vec!["a"]);
    assert_eq!(result.keys_with(DiffStatus::Unchanged), vec!["b"]);
    assert_eq!(result.keys_with(DiffStatus::Added), vec!["c"]);
    assert!(result.entries.iter().all(|e| e.before.is_none() && e.after.is_none()));
}

#[test]
fn auto_prefers_commit_then_version_then_presence() {
    let left: Vec<Dependency> = vec![
        "bare".into(),
        pkg("pinned", "abc").into(),
        BinaryDependency::new("built", "1.0").into(),
        pkg("switched", "abc").into(),
    ];
    let right: Vec<Dependency> = vec![
        "bare".into(),
        pkg("pinned", "abc").into(),
        BinaryDependency::new("built", "1.1").into(),
        BinaryDependency::new("switched", "abc").into(),
    ];

    let result = reconcile(&left, &right, CompareField::Auto);

    assert_eq!(result.get("bare").map(|e| e.status), Some(DiffStatus::Unchanged));
    assert_eq!(result.get("pinned").map(|e| e.status), Some(DiffStatus::Unchanged));
    assert_eq!(result.get("built").map(|e| e.status), Some(DiffStatus::Changed));
    // One side tracks a commit, the other a version: nothing comparable.
    assert_eq!(result.get("switched").map(|e| e.status), Some(DiffStatus::Changed));

    let built = result.get("built").expect("built entry");
    assert_eq!(built.before.as_deref(), Some("1.0"));
    assert_eq!(built.after.as_deref(), Some("1.1"));
}

#[test]
fn duplicate_names_use_first_occurrence_and_are_reported() {
    let left = vec![pkg("dep1", "abc"), pkg("dep1", "zzz"), pkg("dep1", "yyy")];
    let right = vec![pkg("dep1", "abc")];

    let result = reconcile(&left, &right, CompareField::Commit);

    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.get("dep1").map(|e| e.status), Some(DiffStatus::Unchanged));
    assert_eq!(result.duplicates.len(), 1);
    let dup = &result.duplicates[0];
    assert_eq!(dup.name, "dep1");
    assert_eq!(dup.side, Side::Left);
    assert_eq!(dup.occurrences, 3);
}

#[test]
fn empty_inputs_produce_empty_result() {
    let empty: Vec<PackageDependency> = Vec::new();
    let result = reconcile(&empty, &empty, CompareField::Commit);
    assert!(result.entries.is_empty());
    assert!(result.duplicates.is_empty());
    assert_eq!(result.counts().total(), 0);
}
