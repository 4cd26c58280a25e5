//! TOML configuration for opening a [`FileStore`] rooted at a directory.
//!
//! ```toml
//! root = "/var/lib/stash"
//! extension = "txt"    # optional
//! create_root = true   # default
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::file::FileStore;
use crate::resolver::RootResolver;

/// Where and how a store keeps its files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory every name is stored under.
    pub root: PathBuf,
    /// Extension appended to every stored file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Create `root` (and its parents) when opening.
    #[serde(default = "default_create_root")]
    pub create_root: bool,
}

fn default_create_root() -> bool {
    true
}

impl StoreConfig {
    /// Config for `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: None,
            create_root: default_create_root(),
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Render the config as TOML.
    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// The resolver this config describes.
    pub fn resolver(&self) -> RootResolver {
        let resolver = RootResolver::new(&self.root);
        match &self.extension {
            Some(ext) => resolver.with_extension(ext.as_str()),
            None => resolver,
        }
    }

    /// Open a store rooted at `root`, creating the directory if configured.
    pub fn open(&self) -> StoreResult<FileStore<RootResolver>> {
        if self.create_root {
            fs::create_dir_all(&self.root).map_err(|e| {
                StoreError::Config(format!("create root {}: {e}", self.root.display()))
            })?;
        } else if !self.root.is_dir() {
            return Err(StoreError::Config(format!(
                "root is not a directory: {}",
                self.root.display()
            )));
        }

        info!(root = %self.root.display(), extension = ?self.extension, "store opened");
        Ok(FileStore::new(self.resolver()))
    }
}
