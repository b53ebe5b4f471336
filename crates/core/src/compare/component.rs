use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::compare::reconcile::{reconcile, CompareField, Reconciliation};
use crate::compare::{CompareError, CompareResult, MissingSide};
use crate::model::{Component, ComponentKind, ComponentVariant};

/// Scalar component fields that take part in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentField {
    Url,
    Version,
    Commit,
    Pid,
}

impl ComponentField {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentField::Url => "URL",
            ComponentField::Version => "Version",
            ComponentField::Commit => "Commit",
            ComponentField::Pid => "PID",
        }
    }
}

/// Before/after values of one scalar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: ComponentField,
    pub before: String,
    pub after: String,
    pub is_different: bool,
}

impl FieldDiff {
    fn new(field: ComponentField, before: &str, after: &str) -> Self {
        Self {
            field,
            before: before.to_string(),
            after: after.to_string(),
            is_different: before != after,
        }
    }
}

/// Dependency-level part of a component diff, shaped by the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum DependencyDiff {
    Device {
        /// Matched by name, compared by commit.
        package_dependencies: Reconciliation,
        /// Matched by name, compared by version.
        binary_dependencies: Reconciliation,
    },
    Common {
        dependencies: Reconciliation,
        /// Membership only; file bodies are never compared.
        files: Reconciliation,
    },
}

impl DependencyDiff {
    pub fn has_changes(&self) -> bool {
        match self {
            DependencyDiff::Device { package_dependencies, binary_dependencies } => {
                package_dependencies.has_changes() || binary_dependencies.has_changes()
            }
            DependencyDiff::Common { dependencies, files } => {
                dependencies.has_changes() || files.has_changes()
            }
        }
    }
}

/// Full comparison of one component across two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDiff {
    pub name: String,
    pub variant: ComponentVariant,
    pub fields: Vec<FieldDiff>,
    pub dependencies: DependencyDiff,
}

impl ComponentDiff {
    pub fn field(&self, field: ComponentField) -> Option<&FieldDiff> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn changed_fields(&self) -> Vec<ComponentField> {
        self.fields.iter().filter(|f| f.is_different).map(|f| f.field).collect()
    }

    pub fn has_changes(&self) -> bool {
        self.fields.iter().any(|f| f.is_different) || self.dependencies.has_changes()
    }
}

/// Compare two snapshots of the same component.
///
/// Both sides must be present and of the same variant. The name of the left
/// component labels the result; callers are expected to pair components by
/// name before calling this.
pub fn compare_components(
    left: Option<&Component>,
    right: Option<&Component>,
) -> CompareResult<ComponentDiff> {
    let (left, right) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        (None, Some(_)) => return Err(CompareError::MissingComponent { side: MissingSide::Left }),
        (Some(_), None) => return Err(CompareError::MissingComponent { side: MissingSide::Right }),
        (None, None) => return Err(CompareError::MissingComponent { side: MissingSide::Both }),
    };

    let mut fields = vec![
        FieldDiff::new(ComponentField::Url, &left.url, &right.url),
        FieldDiff::new(ComponentField::Version, &left.version, &right.version),
        FieldDiff::new(ComponentField::Commit, &left.commit, &right.commit),
    ];

    let dependencies = match (&left.kind, &right.kind) {
        (
            ComponentKind::Device {
                pid: left_pid,
                package_dependencies: left_pkgs,
                binary_dependencies: left_bins,
            },
            ComponentKind::Device {
                pid: right_pid,
                package_dependencies: right_pkgs,
                binary_dependencies: right_bins,
            },
        ) => {
            fields.push(FieldDiff::new(ComponentField::Pid, left_pid, right_pid));
            DependencyDiff::Device {
                package_dependencies: reconcile(left_pkgs, right_pkgs, CompareField::Commit),
                binary_dependencies: reconcile(left_bins, right_bins, CompareField::Version),
            }
        }
        (
            ComponentKind::Common { dependencies: left_deps, files: left_files },
            ComponentKind::Common { dependencies: right_deps, files: right_files },
        ) => DependencyDiff::Common {
            dependencies: reconcile(left_deps, right_deps, CompareField::Auto),
            files: reconcile(left_files, right_files, CompareField::Auto),
        },
        (left_kind, right_kind) => {
            warn!(
                component = %left.name,
                left = %left_kind.variant(),
                right = %right_kind.variant(),
                "refusing to compare components of different variants"
            );
            return Err(CompareError::VariantMismatch {
                name: left.name.clone(),
                left: left_kind.variant(),
                right: right_kind.variant(),
            });
        }
    };

    let diff = ComponentDiff { name: left.name.clone(), variant: left.variant(), fields, dependencies };
    debug!(component = %diff.name, changed = diff.has_changes(), "compared component");
    Ok(diff)
}
