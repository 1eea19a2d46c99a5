//! Loading graph definitions.
//!
//! [`GraphLoader`] tries the configured graph file first, then a local cache
//! of the last good copy, then the built-in default checklist. A definition
//! only counts as loaded once it passes [`GraphStore`] validation, so a
//! broken primary file never overwrites a good cache.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::GraphConfig;
use crate::error::{AppResult, SourceError, SourceResult};
use crate::graph::{GraphDefinition, GraphStore};
use crate::presets;

/// Where a loaded graph came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphOrigin {
    Primary,
    Cache,
    Builtin,
}

impl std::fmt::Display for GraphOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphOrigin::Primary => write!(f, "primary"),
            GraphOrigin::Cache => write!(f, "cache"),
            GraphOrigin::Builtin => write!(f, "builtin"),
        }
    }
}

/// A validated graph and its origin.
#[derive(Debug)]
pub struct LoadedGraph {
    pub store: GraphStore,
    pub origin: GraphOrigin,
}

/// Parse a definition from JSON text.
pub fn parse_definition(json: &str) -> SourceResult<GraphDefinition> {
    Ok(serde_json::from_str(json)?)
}

/// Read a definition from a JSON file.
pub fn read_definition(path: &Path) -> SourceResult<GraphDefinition> {
    let raw = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_definition(&raw)
}

/// Write a definition as pretty JSON, creating parent directories.
pub fn write_definition(path: &Path, definition: &GraphDefinition) -> SourceResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SourceError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(definition)?;
    fs::write(path, json).map_err(|source| SourceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and validate a graph file.
pub fn load_store(path: &Path) -> AppResult<GraphStore> {
    let definition = read_definition(path)?;
    Ok(GraphStore::new(definition)?)
}

/// Primary file, then cache, then built-in fallback chain.
#[derive(Debug, Clone, Default)]
pub struct GraphLoader {
    primary: Option<PathBuf>,
    cache: Option<PathBuf>,
}

impl GraphLoader {
    pub fn new(primary: Option<PathBuf>, cache: Option<PathBuf>) -> Self {
        Self { primary, cache }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self::new(config.path.clone(), Some(config.cache_path.clone()))
    }

    /// Load the best available graph. Never fails: the built-in checklist
    /// is the last resort.
    pub fn load(&self) -> AppResult<LoadedGraph> {
        if let Some(primary) = &self.primary {
            match load_store(primary) {
                Ok(store) => {
                    info!(path = %primary.display(), name = %store.name(), "Loaded decision graph");
                    self.refresh_cache(&store);
                    return Ok(LoadedGraph {
                        store,
                        origin: GraphOrigin::Primary,
                    });
                }
                Err(e) => {
                    warn!(path = %primary.display(), error = %e, "Primary graph unavailable");
                }
            }
        }

        if let Some(cache) = &self.cache {
            if cache.exists() {
                match load_store(cache) {
                    Ok(store) => {
                        info!(path = %cache.display(), "Loaded decision graph from cache");
                        return Ok(LoadedGraph {
                            store,
                            origin: GraphOrigin::Cache,
                        });
                    }
                    Err(e) => {
                        warn!(path = %cache.display(), error = %e, "Cached graph unusable");
                    }
                }
            } else {
                debug!(path = %cache.display(), "No cached graph");
            }
        }

        info!("Using built-in checklist");
        let store = GraphStore::new(presets::default_checklist())?;
        Ok(LoadedGraph {
            store,
            origin: GraphOrigin::Builtin,
        })
    }

    fn refresh_cache(&self, store: &GraphStore) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(e) = write_definition(cache, &store.to_definition()) {
            warn!(path = %cache.display(), error = %e, "Failed to refresh graph cache");
        }
    }
}
