// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store configuration
//!
//! `StoreConfig` is what a store is constructed with. `TandemConfig` is the
//! optional `tandem.toml` file that supplies per-store settings by name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Decides whether a change should be emitted.
///
/// Called with the last emitted snapshot and the new one; returning `false`
/// suppresses the emission.
pub type SyncFilter = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Options for the change reaction
#[derive(Clone, Default)]
pub struct SyncOptions {
    /// Quiet period before a change is emitted; `None` emits immediately
    pub debounce: Option<Duration>,
    pub filter: Option<SyncFilter>,
}

impl SyncOptions {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }

    pub fn with_filter(
        mut self,
        filter: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }
}

impl fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("debounce", &self.debounce)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Configuration consumed when a store is constructed
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Start loading as soon as the store is created
    pub auto_load: bool,
    /// Activate sync after load, and again after every merge
    pub sync_enabled: bool,
    pub sync_options: SyncOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            auto_load: false,
            sync_enabled: true,
            sync_options: SyncOptions::default(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_load(mut self, auto_load: bool) -> Self {
        self.auto_load = auto_load;
        self
    }

    pub fn sync_enabled(mut self, sync_enabled: bool) -> Self {
        self.sync_enabled = sync_enabled;
        self
    }

    pub fn sync_options(mut self, sync_options: SyncOptions) -> Self {
        self.sync_options = sync_options;
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Per-store settings as written in `tandem.toml`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    pub auto_load: bool,
    pub sync_enabled: bool,
    #[serde(with = "humantime_serde")]
    pub debounce: Option<Duration>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            auto_load: false,
            sync_enabled: true,
            debounce: None,
        }
    }
}

impl StoreSettings {
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            auto_load: self.auto_load,
            sync_enabled: self.sync_enabled,
            sync_options: SyncOptions {
                debounce: self.debounce,
                filter: None,
            },
        }
    }
}

/// Contents of `tandem.toml`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TandemConfig {
    /// Socket the authoritative process listens on
    pub socket: Option<PathBuf>,
    pub stores: BTreeMap<String, StoreSettings>,
}

impl TandemConfig {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Store config for `name`, defaults if the file doesn't mention it
    pub fn store_config(&self, name: &str) -> StoreConfig {
        self.stores
            .get(name)
            .map(StoreSettings::to_store_config)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
