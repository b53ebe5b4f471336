use std::collections::HashSet;

use tracing::debug;

use crate::compare::component::{compare_components, ComponentDiff};
use crate::compare::reconcile::{reconcile, CompareField, Reconciliation};
use crate::compare::CompareResult;
use crate::diff::lines::{diff_values, LineDiff};
use crate::model::{name_matches, Server};

/// Two servers lined up for comparison.
///
/// Holds only borrowed, read-only snapshots plus the shared-name list computed
/// up front. Component diffs are computed when asked for, not eagerly.
#[derive(Debug, Clone)]
pub struct ServerComparison<'a> {
    left: &'a Server,
    right: &'a Server,
    filter: Option<String>,
    common: Vec<&'a str>,
}

/// Line up two servers, keeping shared component names that match `filter`.
///
/// The filter is a case-insensitive substring match on the term as given;
/// `None` or an empty string keeps every shared name. Names keep the left server's order.
pub fn compare_servers<'a>(
    left: &'a Server,
    right: &'a Server,
    filter: Option<&str>,
) -> ServerComparison<'a> {
    let filter = filter.filter(|term| !term.is_empty()).map(str::to_string);
    let right_names: HashSet<&str> = right.component_names().collect();

    let mut seen = HashSet::new();
    let common: Vec<&str> = left
        .component_names()
        .filter(|name| right_names.contains(name))
        .filter(|name| seen.insert(*name))
        .filter(|name| filter.as_deref().map_or(true, |term| name_matches(name, term)))
        .collect();

    debug!(
        left = %left.name,
        right = %right.name,
        common = common.len(),
        "lined up servers for comparison"
    );

    ServerComparison { left, right, filter, common }
}

impl<'a> ServerComparison<'a> {
    pub fn left(&self) -> &'a Server {
        self.left
    }

    pub fn right(&self) -> &'a Server {
        self.right
    }

    /// Search term, if any.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Component names present on both servers, in left order.
    pub fn common_names(&self) -> &[&'a str] {
        &self.common
    }

    /// Components only the left server has (filtered like `common_names`).
    pub fn left_only(&self) -> Vec<&'a str> {
        self.one_sided(self.left, self.right)
    }

    /// Components only the right server has (filtered like `common_names`).
    pub fn right_only(&self) -> Vec<&'a str> {
        self.one_sided(self.right, self.left)
    }

    fn one_sided(&self, from: &'a Server, other: &'a Server) -> Vec<&'a str> {
        let other_names: HashSet<&str> = other.component_names().collect();
        let mut seen = HashSet::new();
        from.component_names()
            .filter(|name| !other_names.contains(name))
            .filter(|name| seen.insert(*name))
            .filter(|name| self.filter.as_deref().map_or(true, |term| name_matches(name, term)))
            .collect()
    }

    /// Commit-level overview of every component on either server.
    ///
    /// Ignores the filter; it is a summary of the whole pair.
    pub fn overview(&self) -> Reconciliation {
        reconcile(&self.left.components, &self.right.components, CompareField::Auto)
    }

    /// Compare the component called `name` on both servers.
    ///
    /// Lookup takes the first component with that name on each side. A name
    /// that is missing on either server yields `MissingComponent`.
    pub fn diff_for(&self, name: &str) -> CompareResult<ComponentDiff> {
        compare_components(self.left.component(name), self.right.component(name))
    }

    /// Diff every shared name; one failure does not affect the others.
    pub fn diff_all(&self) -> Vec<(&'a str, CompareResult<ComponentDiff>)> {
        self.common.iter().map(|name| (*name, self.diff_for(name))).collect()
    }

    /// Whole-document line diff of the two servers.
    pub fn document_diff(&self) -> serde_json::Result<Vec<LineDiff>> {
        document_diff(self.left, self.right)
    }
}

/// Serialize both servers and diff the documents line by line.
///
/// This ignores component matching entirely: reordered components or fields
/// show up as removed and re-added lines.
pub fn document_diff(left: &Server, right: &Server) -> serde_json::Result<Vec<LineDiff>> {
    diff_values(left, right)
}
