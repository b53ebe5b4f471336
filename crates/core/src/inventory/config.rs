use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diff::{DiffMode, ViewMode};
use crate::inventory::DocumentFormat;

/// File names looked up, in order, when no explicit config path is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["rackdiff.json", "rackdiff.yaml", "rackdiff.yml"];

/// Inventory path used when neither the CLI nor a config file names one.
pub const DEFAULT_INVENTORY: &str = "servers.json";

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported config format for {0}; expected .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),
}

/// Dashboard defaults, usually from `rackdiff.json` next to the inventory.
///
/// Every field is optional in the file; command-line flags win over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Inventory file, relative to the config file's directory if not absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<String>,
    pub diff_mode: DiffMode,
    pub view_mode: ViewMode,
    /// Directory holding component file bodies, relative like `inventory`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_dir: Option<String>,
    /// Directory the config was loaded from; not part of the file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl DashboardConfig {
    /// Load a config file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let body = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let mut config: DashboardConfig = match format {
            DocumentFormat::Json => serde_json::from_str(&body)
                .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })?,
            DocumentFormat::Yaml => serde_yaml::from_str(&body)
                .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })?,
        };
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Load the first of [`CONFIG_FILE_NAMES`] present in `dir`, if any.
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::load(&candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve a configured path against the config's directory.
    pub fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Inventory path from the config, or [`DEFAULT_INVENTORY`].
    pub fn inventory_path(&self) -> PathBuf {
        self.resolve(self.inventory.as_deref().unwrap_or(DEFAULT_INVENTORY))
    }

    pub fn files_dir_path(&self) -> Option<PathBuf> {
        self.files_dir.as_deref().map(|dir| self.resolve(dir))
    }
}
