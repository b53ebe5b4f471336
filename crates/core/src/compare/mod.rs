//! Comparison of components and servers across two inventory snapshots.
//!
//! Layers, bottom-up:
//! - `reconcile`: match two named collections and classify each name.
//! - `component`: field and dependency diff for one matched pair.
//! - `server`: shared-name intersection and per-component diffs on demand.
//!
//! Everything here is a pure function of its inputs. View state such as
//! search filters or which row is expanded belongs to the caller.

pub mod component;
pub mod reconcile;
pub mod server;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ComponentVariant;

pub use component::{compare_components, ComponentDiff, ComponentField, DependencyDiff, FieldDiff};
pub use reconcile::{
    reconcile, CompareField, DiffCounts, DiffEntry, DiffStatus, DuplicateName, Named,
    Reconciliation,
};
pub use server::{compare_servers, document_diff, ServerComparison};

/// One side of a two-way comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which inputs were absent when a comparison was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSide {
    Left,
    Right,
    Both,
}

impl fmt::Display for MissingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissingSide::Left => "left side",
            MissingSide::Right => "right side",
            MissingSide::Both => "both sides",
        };
        f.write_str(label)
    }
}

/// Error for a single comparison.
///
/// These are local to the comparison that produced them; callers render them
/// inline and carry on with the rest of the view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// One or both components were not supplied.
    #[error("Component missing on {side}; unable to compare")]
    MissingComponent { side: MissingSide },

    /// A device component was paired with a common component.
    #[error("Component {name} is a {left} component on the left but a {right} component on the right")]
    VariantMismatch { name: String, left: ComponentVariant, right: ComponentVariant },
}

/// Convenience result type for comparisons.
pub type CompareResult<T> = Result<T, CompareError>;
