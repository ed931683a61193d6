// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide dependencies shared by every store

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tandem_adapters::SyncChannel;
use tandem_core::ProcessRole;
use tandem_storage::{store_path, JsonFileStore, PersistenceAdapter};

/// Everything a store needs from its process
#[derive(Clone)]
pub struct StoreContext {
    /// Directory holding one document per store
    pub base_dir: PathBuf,
    pub role: ProcessRole,
    pub channel: Arc<dyn SyncChannel>,
    pub persistence: Arc<dyn PersistenceAdapter>,
}

impl StoreContext {
    /// Context persisting to JSON files under `base_dir`.
    ///
    /// `base_dir` is made absolute so channel names derived from store paths
    /// agree between processes started in different working directories.
    pub fn new(base_dir: impl Into<PathBuf>, role: ProcessRole, channel: Arc<dyn SyncChannel>) -> Self {
        let base_dir = base_dir.into();
        let base_dir = std::path::absolute(&base_dir).unwrap_or(base_dir);
        Self {
            base_dir,
            role,
            channel,
            persistence: Arc::new(JsonFileStore::new()),
        }
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn PersistenceAdapter>) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn store_path(&self, name: &str) -> PathBuf {
        store_path(&self.base_dir, name)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
