//! Published configuration snapshot with atomic replacement.

use super::agent::AgentConfig;
use super::snapshot::ConfigSnapshot;
use crate::error::ConfigError;
use arc_swap::ArcSwap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a snapshot is read from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// An `agents.conf` file on disk.
    File(PathBuf),
    /// Configuration text already in memory.
    Text(String),
}

impl ConfigSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ConfigSource::File(path.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        ConfigSource::Text(text.into())
    }

    fn read(&self) -> Result<String, ConfigError> {
        match self {
            ConfigSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
            ConfigSource::Text(text) => Ok(text.clone()),
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfigSource::File(path) => path.display().to_string(),
            ConfigSource::Text(_) => "<inline>".to_string(),
        }
    }
}

/// Holds the active [`ConfigSnapshot`].
///
/// Readers get their own `Arc` from [`ConfigStore::current`] and keep seeing
/// that snapshot even after a newer one is published.
pub struct ConfigStore {
    active: ArcSwap<ConfigSnapshot>,
}

impl ConfigStore {
    /// Create a store whose active snapshot is empty.
    pub fn new() -> Self {
        Self {
            active: ArcSwap::from_pointee(ConfigSnapshot::empty()),
        }
    }

    /// Read and validate a snapshot without publishing it.
    pub fn load(source: &ConfigSource) -> Result<ConfigSnapshot, ConfigError> {
        let text = source.read()?;
        let snapshot = ConfigSnapshot::parse(&text)?;
        debug!(
            source = %source.describe(),
            agents = snapshot.len(),
            "Loaded agent configuration"
        );
        Ok(snapshot)
    }

    /// Replace the active snapshot.
    pub fn publish(&self, snapshot: ConfigSnapshot) -> Arc<ConfigSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.active.store(Arc::clone(&snapshot));
        info!(agents = snapshot.len(), "Published agent configuration");
        snapshot
    }

    /// A new reference to the active snapshot.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        self.active.load_full()
    }

    /// Exact username lookup in a given snapshot.
    pub fn lookup(snapshot: &ConfigSnapshot, username: &str) -> Option<Arc<AgentConfig>> {
        snapshot.get(username)
    }

    /// Prefix lookup in a given snapshot, in key order.
    pub fn lookup_prefix(snapshot: &ConfigSnapshot, prefix: &str) -> Vec<Arc<AgentConfig>> {
        snapshot.find_prefix(prefix)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
