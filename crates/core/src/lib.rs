//! rackdiff-core
//!
//! Core library for viewing and comparing server component inventories.
//!
//! This crate defines the entity model (servers, components, dependencies),
//! the named-collection reconciler and component/server comparators, a
//! line-based document differ with unified and split layouts, an expandable
//! tree view, and inventory/config loading.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends. The CLI only owns view state and output.

pub mod compare;
pub mod diff;
pub mod inventory;
pub mod model;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
