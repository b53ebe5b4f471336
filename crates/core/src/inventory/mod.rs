//! Loading and sanity-checking server inventories.
//!
//! An inventory file is either a top-level array of servers or an object with
//! a `servers` array, in JSON or YAML. Loading does no cross-validation; call
//! [`Inventory::validate`] for data-quality warnings.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{name_matches, ComponentKind, Server};

pub mod config;
pub mod content;

pub use config::{ConfigError, DashboardConfig};
pub use content::{ContentError, DirectoryContent, FileContentProvider, PlaceholderContent};

/// Error type for inventory loading.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to read inventory at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse JSON inventory: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML inventory: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported inventory format '{0}'; expected .json, .yaml or .yml")]
    UnsupportedFormat(String),
}

/// Convenience result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Serialization format of an inventory (or config) file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InventoryDocument {
    Servers(Vec<Server>),
    Wrapped { servers: Vec<Server> },
}

/// An ordered collection of servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub servers: Vec<Server>,
}

impl Inventory {
    pub fn new(servers: Vec<Server>) -> Self {
        Self { servers }
    }

    /// Read and parse an inventory file, choosing the format by extension.
    pub fn from_path(path: &Path) -> InventoryResult<Self> {
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            InventoryError::UnsupportedFormat(
                path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_string(),
            )
        })?;
        let body = std::fs::read_to_string(path)
            .map_err(|source| InventoryError::Io { path: path.to_path_buf(), source })?;
        let inventory = Self::parse(&body, format)?;
        debug!(path = %path.display(), servers = inventory.len(), "loaded inventory");
        Ok(inventory)
    }

    pub fn parse(body: &str, format: DocumentFormat) -> InventoryResult<Self> {
        let document: InventoryDocument = match format {
            DocumentFormat::Json => serde_json::from_str(body)?,
            DocumentFormat::Yaml => serde_yaml::from_str(body)?,
        };
        let servers = match document {
            InventoryDocument::Servers(servers) => servers,
            InventoryDocument::Wrapped { servers } => servers,
        };
        Ok(Self { servers })
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// First server with exactly this name.
    pub fn server(&self, name: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.servers.iter().map(|s| s.name.as_str()).collect()
    }

    /// Servers whose name contains `term`, case-insensitively, in order.
    pub fn filter(&self, term: &str) -> Vec<&Server> {
        self.servers.iter().filter(|s| name_matches(&s.name, term)).collect()
    }

    /// Report duplicated identity keys at every level.
    ///
    /// Comparisons still work on such data (first occurrence wins); these
    /// warnings exist so the data source can be fixed.
    pub fn validate(&self) -> Vec<InventoryWarning> {
        let mut warnings = Vec::new();

        for name in repeated(self.servers.iter().map(|s| s.name.as_str())) {
            warnings.push(InventoryWarning::DuplicateServer { server: name.to_string() });
        }

        for server in &self.servers {
            for name in repeated(server.component_names()) {
                warnings.push(InventoryWarning::DuplicateComponent {
                    server: server.name.clone(),
                    component: name.to_string(),
                });
            }

            for component in &server.components {
                let (deps, files): (Vec<&str>, Vec<&str>) = match &component.kind {
                    ComponentKind::Device { package_dependencies, binary_dependencies, .. } => {
                        let mut deps: Vec<&str> =
                            repeated(package_dependencies.iter().map(|d| d.name.as_str()));
                        deps.extend(repeated(binary_dependencies.iter().map(|d| d.name.as_str())));
                        (deps, Vec::new())
                    }
                    ComponentKind::Common { dependencies, files } => (
                        repeated(dependencies.iter().map(|d| d.name())),
                        repeated(files.iter().map(String::as_str)),
                    ),
                };

                for dep in deps {
                    warnings.push(InventoryWarning::DuplicateDependency {
                        server: server.name.clone(),
                        component: component.name.clone(),
                        dependency: dep.to_string(),
                    });
                }
                for file in files {
                    warnings.push(InventoryWarning::DuplicateFile {
                        server: server.name.clone(),
                        component: component.name.clone(),
                        file: file.to_string(),
                    });
                }
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }
        warnings
    }
}

/// Names that occur more than once, each reported once, in first-repeat order.
fn repeated<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            out.push(name);
        }
    }
    out
}

/// A data-quality problem found by [`Inventory::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventoryWarning {
    DuplicateServer { server: String },
    DuplicateComponent { server: String, component: String },
    DuplicateDependency { server: String, component: String, dependency: String },
    DuplicateFile { server: String, component: String, file: String },
}

impl fmt::Display for InventoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryWarning::DuplicateServer { server } => {
                write!(f, "Server name '{server}' appears more than once")
            }
            InventoryWarning::DuplicateComponent { server, component } => {
                write!(f, "Server '{server}': component '{component}' appears more than once")
            }
            InventoryWarning::DuplicateDependency { server, component, dependency } => write!(
                f,
                "Server '{server}', component '{component}': dependency '{dependency}' appears more than once"
            ),
            InventoryWarning::DuplicateFile { server, component, file } => write!(
                f,
                "Server '{server}', component '{component}': file '{file}' appears more than once"
            ),
        }
    }
}

/// SHA-256 of the server's canonical JSON document, as lowercase hex.
///
/// Two servers with equal fingerprints serialize to identical documents.
pub fn fingerprint(server: &Server) -> serde_json::Result<String> {
    let bytes = serde_json::to_vec(server)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// First twelve hex digits of a fingerprint, for display.
pub fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
