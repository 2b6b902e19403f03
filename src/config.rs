//! Configuration for the flowgraph CLI.

use std::path::{Path, PathBuf};

use flowgraph_core::{ComponentCatalog, ComponentKind, Error, Result};
use flowgraph_editor::ids::DEFAULT_ID_LENGTH;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "FLOWGRAPH_CONFIG";

/// Settings read from `flowgraph.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowgraphConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,

    /// Length of generated node ids.
    #[serde(default = "default_id_length")]
    pub id_length: usize,

    /// The component catalog.
    #[serde(default)]
    pub components: Vec<ComponentKind>,
}

impl Default for FlowgraphConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            id_length: default_id_length(),
            components: Vec::new(),
        }
    }
}

impl FlowgraphConfig {
    /// Load configuration from a file; `.json` files are read as JSON,
    /// anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns `FileReadFailed` if the file cannot be read, or a parse
    /// error if its contents do not match the schema.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_read_failed(path, e.to_string()))?;

        if path.extension().is_some_and(|e| e == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// Resolve the config file from an explicit path, then
    /// `FLOWGRAPH_CONFIG`; without either, use defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`from_file`](Self::from_file) failures.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        path.map_or_else(|| Ok(Self::default()), |path| Self::from_file(&path))
    }

    /// The catalog built from `[[components]]`.
    #[must_use]
    pub fn catalog(&self) -> ComponentCatalog {
        ComponentCatalog::from_components(self.components.iter().cloned())
    }
}

const fn default_id_length() -> usize {
    DEFAULT_ID_LENGTH
}
