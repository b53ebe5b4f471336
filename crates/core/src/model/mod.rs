//! Core data model for servers, components, and their dependencies.
//!
//! These are immutable snapshots handed to us by whatever loads an inventory.
//! Nothing in the comparison layer mutates them.
//!
//! The on-disk document shape is the one the dashboard fixtures use: camelCase
//! keys, with the component kind fields (`pid`, `packageDependencies`, ...)
//! sitting directly inside the component object. The kind is decided once at
//! deserialization time and is explicit from then on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A package dependency pinned to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    pub commit: String,
}

impl PackageDependency {
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self { name: name.into(), commit: commit.into() }
    }
}

/// A binary dependency pinned to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryDependency {
    pub name: String,
    pub version: String,
}

impl BinaryDependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into() }
    }
}

/// Entry of a common component's `dependencies` list.
///
/// Older inventories stored bare names; newer ones store package dependencies.
/// Variant order matters for the untagged decoding: an object carrying a
/// `commit` is a package dependency even if it also has a `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Name(String),
    Package(PackageDependency),
    Binary(BinaryDependency),
}

impl Dependency {
    pub fn name(&self) -> &str {
        match self {
            Dependency::Name(name) => name,
            Dependency::Package(dep) => &dep.name,
            Dependency::Binary(dep) => &dep.name,
        }
    }
}

impl From<PackageDependency> for Dependency {
    fn from(dep: PackageDependency) -> Self {
        Dependency::Package(dep)
    }
}

impl From<BinaryDependency> for Dependency {
    fn from(dep: BinaryDependency) -> Self {
        Dependency::Binary(dep)
    }
}

impl From<&str> for Dependency {
    fn from(name: &str) -> Self {
        Dependency::Name(name.to_string())
    }
}

/// Which of the two component shapes a record has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentVariant {
    Device,
    Common,
}

impl ComponentVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentVariant::Device => "device",
            ComponentVariant::Common => "common",
        }
    }
}

impl fmt::Display for ComponentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific part of a component.
///
/// Decoding tries `Device` first; it requires a `pid`, so anything without one
/// falls through to `Common`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentKind {
    Device {
        pid: String,
        #[serde(rename = "packageDependencies", default)]
        package_dependencies: Vec<PackageDependency>,
        #[serde(rename = "binaryDependencies", default)]
        binary_dependencies: Vec<BinaryDependency>,
    },
    Common {
        #[serde(default)]
        dependencies: Vec<Dependency>,
        #[serde(default)]
        files: Vec<String>,
    },
}

impl ComponentKind {
    /// Device kind with no dependencies yet.
    pub fn device(pid: impl Into<String>) -> Self {
        ComponentKind::Device {
            pid: pid.into(),
            package_dependencies: Vec::new(),
            binary_dependencies: Vec::new(),
        }
    }

    /// Common kind with no dependencies or files yet.
    pub fn common() -> Self {
        ComponentKind::Common { dependencies: Vec::new(), files: Vec::new() }
    }

    pub fn variant(&self) -> ComponentVariant {
        match self {
            ComponentKind::Device { .. } => ComponentVariant::Device,
            ComponentKind::Common { .. } => ComponentVariant::Common,
        }
    }
}

/// One inventoried unit on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub url: String,
    /// Identity key, unique within a server and used for cross-server matching.
    pub name: String,
    pub version: String,
    pub commit: String,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            url: String::new(),
            name: name.into(),
            version: String::new(),
            commit: String::new(),
            kind,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = commit.into();
        self
    }

    pub fn variant(&self) -> ComponentVariant {
        self.kind.variant()
    }

    /// Process id, present only on device components.
    pub fn pid(&self) -> Option<&str> {
        match &self.kind {
            ComponentKind::Device { pid, .. } => Some(pid),
            ComponentKind::Common { .. } => None,
        }
    }

    /// Commit shortened for one-line summaries.
    pub fn short_commit(&self) -> &str {
        match self.commit.char_indices().nth(7) {
            Some((idx, _)) => &self.commit[..idx],
            None => &self.commit,
        }
    }
}

/// A named server and the components installed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Server {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), components: Vec::new() }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// First component with the given name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name.as_str())
    }
}

/// Case-insensitive substring match used by every name filter.
///
/// An empty term matches everything.
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}
