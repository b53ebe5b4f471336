use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::compare::Side;
use crate::model::{BinaryDependency, Component, Dependency, PackageDependency};

/// Anything that can be matched by name and compared by commit/version.
pub trait Named {
    /// Identity key used for matching across the two collections.
    fn name(&self) -> &str;

    fn commit(&self) -> Option<&str> {
        None
    }

    fn version(&self) -> Option<&str> {
        None
    }
}

impl Named for PackageDependency {
    fn name(&self) -> &str {
        &self.name
    }

    fn commit(&self) -> Option<&str> {
        Some(&self.commit)
    }
}

impl Named for BinaryDependency {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        Some(&self.version)
    }
}

impl Named for Dependency {
    fn name(&self) -> &str {
        Dependency::name(self)
    }

    fn commit(&self) -> Option<&str> {
        match self {
            Dependency::Package(dep) => Some(&dep.commit),
            _ => None,
        }
    }

    fn version(&self) -> Option<&str> {
        match self {
            Dependency::Binary(dep) => Some(&dep.version),
            _ => None,
        }
    }
}

/// Plain strings (file names, bare dependency names) match on identity only.
impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

impl Named for Component {
    fn name(&self) -> &str {
        &self.name
    }

    fn commit(&self) -> Option<&str> {
        Some(&self.commit)
    }

    fn version(&self) -> Option<&str> {
        Some(&self.version)
    }
}

/// Which field decides whether a name present on both sides changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareField {
    Commit,
    Version,
    /// `commit` when both sides carry one, else `version` when both sides
    /// carry one. Items with no tracked field at all match on name alone.
    Auto,
}

/// Outcome for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Unchanged,
    Changed,
    Added,
    Removed,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Unchanged => "unchanged",
            DiffStatus::Changed => "changed",
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
        }
    }

    /// Single-character marker used by the text renderers.
    pub fn marker(&self) -> char {
        match self {
            DiffStatus::Unchanged => ' ',
            DiffStatus::Changed => '~',
            DiffStatus::Added => '+',
            DiffStatus::Removed => '-',
        }
    }
}

/// One reconciled key with the tracked value from each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub key: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub status: DiffStatus,
}

impl DiffEntry {
    pub fn is_different(&self) -> bool {
        self.status != DiffStatus::Unchanged
    }
}

/// A name that occurred more than once in one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateName {
    pub name: String,
    pub side: Side,
    /// Total occurrences, including the first (authoritative) one.
    pub occurrences: usize,
}

/// Per-status tallies of a reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffCounts {
    pub unchanged: usize,
    pub changed: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffCounts {
    pub fn total(&self) -> usize {
        self.unchanged + self.changed + self.added + self.removed
    }

    pub fn differences(&self) -> usize {
        self.changed + self.added + self.removed
    }
}

/// Result of matching two named collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Left order first, then right-only names in right order.
    pub entries: Vec<DiffEntry>,
    /// Data-quality warnings; empty for well-formed inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<DuplicateName>,
}

impl Reconciliation {
    pub fn with_status(&self, status: DiffStatus) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(move |e| e.status == status)
    }

    pub fn added(&self) -> impl Iterator<Item = &DiffEntry> {
        self.with_status(DiffStatus::Added)
    }

    pub fn removed(&self) -> impl Iterator<Item = &DiffEntry> {
        self.with_status(DiffStatus::Removed)
    }

    pub fn changed(&self) -> impl Iterator<Item = &DiffEntry> {
        self.with_status(DiffStatus::Changed)
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &DiffEntry> {
        self.with_status(DiffStatus::Unchanged)
    }

    /// Keys with the given status, in output order.
    pub fn keys_with(&self, status: DiffStatus) -> Vec<&str> {
        self.with_status(status).map(|e| e.key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&DiffEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(DiffEntry::is_different)
    }

    pub fn counts(&self) -> DiffCounts {
        let mut counts = DiffCounts::default();
        for entry in &self.entries {
            match entry.status {
                DiffStatus::Unchanged => counts.unchanged += 1,
                DiffStatus::Changed => counts.changed += 1,
                DiffStatus::Added => counts.added += 1,
                DiffStatus::Removed => counts.removed += 1,
            }
        }
        counts
    }
}

/// Match `left` and `right` by name and classify every name in their union.
///
/// When a name repeats within one input the first occurrence is used and the
/// repeat is reported in [`Reconciliation::duplicates`].
pub fn reconcile<T: Named>(left: &[T], right: &[T], field: CompareField) -> Reconciliation {
    let left_index = NameIndex::build(left, Side::Left);
    let right_index = NameIndex::build(right, Side::Right);

    let mut entries = Vec::with_capacity(left_index.order.len() + right_index.order.len());

    for &(name, item) in &left_index.order {
        let entry = match right_index.get(name) {
            Some(other) => {
                let status = if fields_match(field, item, other) {
                    DiffStatus::Unchanged
                } else {
                    DiffStatus::Changed
                };
                DiffEntry {
                    key: name.to_string(),
                    before: tracked_value(field, item),
                    after: tracked_value(field, other),
                    status,
                }
            }
            None => DiffEntry {
                key: name.to_string(),
                before: tracked_value(field, item),
                after: None,
                status: DiffStatus::Removed,
            },
        };
        entries.push(entry);
    }

    for &(name, item) in &right_index.order {
        if left_index.get(name).is_none() {
            entries.push(DiffEntry {
                key: name.to_string(),
                before: None,
                after: tracked_value(field, item),
                status: DiffStatus::Added,
            });
        }
    }

    let mut duplicates = left_index.duplicates;
    duplicates.extend(right_index.duplicates);

    let result = Reconciliation { entries, duplicates };
    let counts = result.counts();
    debug!(
        left = left.len(),
        right = right.len(),
        changed = counts.changed,
        added = counts.added,
        removed = counts.removed,
        "reconciled named collections"
    );
    result
}

/// First-occurrence index over one input, preserving input order.
struct NameIndex<'a, T> {
    order: Vec<(&'a str, &'a T)>,
    lookup: HashMap<&'a str, &'a T>,
    duplicates: Vec<DuplicateName>,
}

impl<'a, T: Named> NameIndex<'a, T> {
    fn build(items: &'a [T], side: Side) -> Self {
        let mut order = Vec::with_capacity(items.len());
        let mut lookup = HashMap::with_capacity(items.len());
        let mut repeats: Vec<(&'a str, usize)> = Vec::new();

        for item in items {
            let name = item.name();
            if lookup.contains_key(name) {
                match repeats.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, count)) => *count += 1,
                    None => repeats.push((name, 2)),
                }
                continue;
            }
            lookup.insert(name, item);
            order.push((name, item));
        }

        let duplicates = repeats
            .into_iter()
            .map(|(name, occurrences)| {
                warn!(name, side = side.as_str(), occurrences, "duplicate name; first occurrence wins");
                DuplicateName { name: name.to_string(), side, occurrences }
            })
            .collect();

        Self { order, lookup, duplicates }
    }

    fn get(&self, name: &str) -> Option<&'a T> {
        self.lookup.get(name).copied()
    }
}

fn fields_match<T: Named>(field: CompareField, left: &T, right: &T) -> bool {
    match field {
        CompareField::Commit => both_equal(left.commit(), right.commit()),
        CompareField::Version => both_equal(left.version(), right.version()),
        CompareField::Auto => match (left.commit(), right.commit()) {
            (Some(a), Some(b)) => a == b,
            _ => match (left.version(), right.version()) {
                (Some(a), Some(b)) => a == b,
                _ => untracked(left) && untracked(right),
            },
        },
    }
}

/// A field missing on either side never counts as equal.
fn both_equal(left: Option<&str>, right: Option<&str>) -> bool {
    matches!((left, right), (Some(a), Some(b)) if a == b)
}

fn untracked<T: Named>(item: &T) -> bool {
    item.commit().is_none() && item.version().is_none()
}

fn tracked_value<T: Named>(field: CompareField, item: &T) -> Option<String> {
    let value = match field {
        CompareField::Commit => item.commit(),
        CompareField::Version => item.version(),
        CompareField::Auto => item.commit().or_else(|| item.version()),
    };
    value.map(str::to_string)
}
