//! Generic value-tree diffing and rendering.
//!
//! - `lines`: line diff over serialized text, with unified and split layouts.
//! - `tree`: expandable tree view of a single value (not a diff).
//! - `structural`: path-level diff that ignores key order.

pub mod lines;
pub mod structural;
pub mod tree;

pub use lines::{
    diff_text, diff_values, is_identical, render, render_unified, split_view, DiffHeaders,
    DiffMode, LineDiff, LineKind, SplitView,
};
pub use structural::{render_structural, structural_diff, PathChange, PathChangeKind};
pub use tree::{
    render_lines, render_tree, render_value, ExpansionState, NodePath, TreeLine, ViewMode,
    COLLAPSED_MARKER, EXPANDED_MARKER,
};
