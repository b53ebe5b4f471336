use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rackdiff_core::diff::{DiffMode, ViewMode};
use rackdiff_core::inventory::{
    DashboardConfig, DirectoryContent, FileContentProvider, Inventory, PlaceholderContent,
};
use rackdiff_core::model::Server;
use tracing::debug;

use crate::canonicalize_or_current;

/// Options shared by every subcommand; `None` means "use the config".
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<String>,
    pub inventory: Option<String>,
}

/// Effective settings: config file values with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: DashboardConfig,
    pub inventory_path: PathBuf,
}

impl Settings {
    /// Load the config (explicit path, or discovered in the working directory)
    /// and resolve the inventory path.
    pub fn load(options: &GlobalOptions) -> Result<Self> {
        let config = match &options.config {
            Some(path) => {
                let path = canonicalize_or_current(Path::new(path))?;
                DashboardConfig::load(&path)
                    .with_context(|| format!("Failed to load config at {}", path.display()))?
            }
            None => {
                let cwd = canonicalize_or_current(Path::new("."))?;
                DashboardConfig::discover(&cwd)
                    .context("Failed to load config from the current directory")?
                    .unwrap_or_default()
            }
        };

        let inventory_path = match &options.inventory {
            Some(path) => canonicalize_or_current(Path::new(path))?,
            None => canonicalize_or_current(&config.inventory_path())?,
        };

        debug!(
            inventory = %inventory_path.display(),
            config_dir = ?config.base_dir,
            "resolved settings"
        );
        Ok(Self { config, inventory_path })
    }

    pub fn load_inventory(&self) -> Result<Inventory> {
        load_inventory(&self.inventory_path)
    }

    pub fn diff_mode(&self, flag: Option<DiffMode>) -> DiffMode {
        flag.unwrap_or(self.config.diff_mode)
    }

    pub fn view_mode(&self, flag: Option<ViewMode>) -> ViewMode {
        flag.unwrap_or(self.config.view_mode)
    }

    /// Content provider for component files: a directory when one is
    /// configured, the placeholder document otherwise.
    pub fn content_provider(
        &self,
        files_dir: Option<&str>,
    ) -> Result<Box<dyn FileContentProvider>> {
        let dir = match files_dir {
            Some(dir) => Some(canonicalize_or_current(Path::new(dir))?),
            None => self.config.files_dir_path(),
        };
        let provider: Box<dyn FileContentProvider> = match dir {
            Some(dir) => Box::new(DirectoryContent::new(dir)),
            None => Box::new(PlaceholderContent),
        };
        Ok(provider)
    }
}

/// Read an inventory file with a CLI-friendly error.
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    Inventory::from_path(path)
        .with_context(|| format!("Failed to load inventory at {}", path.display()))
}

/// Look up a server by exact name.
pub fn find_server<'a>(inventory: &'a Inventory, name: &str) -> Result<&'a Server> {
    inventory.server(name).ok_or_else(|| {
        let known = inventory.names().join(", ");
        anyhow!("Unknown server '{name}'. Known servers: {known}")
    })
}
