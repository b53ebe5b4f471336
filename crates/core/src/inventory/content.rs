use std::io;
use std::path::{Component as PathComponent, Path, PathBuf};

use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::inventory::DocumentFormat;

/// Error type for file-content lookups.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read file content at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse file content at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// File names must stay inside the content root.
    #[error("Refusing to read file outside the content root: {0}")]
    InvalidName(String),
}

/// Source of displayable content for a component's files.
///
/// The comparison layer only sees file names; content is looked up separately
/// when a file is shown.
pub trait FileContentProvider {
    fn content(&self, file: &str) -> Result<Value, ContentError>;
}

/// Returns the same small sample document for every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderContent;

impl FileContentProvider for PlaceholderContent {
    fn content(&self, _file: &str) -> Result<Value, ContentError> {
        Ok(json!({
            "key1": "value1",
            "key2": { "nestedKey": "nestedValue" },
            "key3": [1, 2, 3]
        }))
    }
}

/// Reads `<root>/<file>` from disk.
///
/// `.json` files are parsed as JSON, `.yaml`/`.yml` as YAML, anything else is
/// returned as a string. Missing files fall back to [`PlaceholderContent`].
#[derive(Debug, Clone)]
pub struct DirectoryContent {
    root: PathBuf,
}

impl DirectoryContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileContentProvider for DirectoryContent {
    fn content(&self, file: &str) -> Result<Value, ContentError> {
        let relative = Path::new(file);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, PathComponent::Normal(_) | PathComponent::CurDir));
        if file.is_empty() || escapes {
            return Err(ContentError::InvalidName(file.to_string()));
        }

        let path = self.root.join(relative);
        if !path.is_file() {
            debug!(path = %path.display(), "file content not found; using placeholder");
            return PlaceholderContent.content(file);
        }

        let body = std::fs::read_to_string(&path)
            .map_err(|source| ContentError::Io { path: path.clone(), source })?;
        match DocumentFormat::from_path(&path) {
            Some(DocumentFormat::Json) => serde_json::from_str(&body)
                .map_err(|e| ContentError::Parse { path, message: e.to_string() }),
            Some(DocumentFormat::Yaml) => serde_yaml::from_str(&body)
                .map_err(|e| ContentError::Parse { path, message: e.to_string() }),
            None => Ok(Value::String(body)),
        }
    }
}
