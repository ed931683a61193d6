// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store lifecycle: load, mutate, observe
//!
//! State changes follow a mutate-then-notify discipline. Every mutation runs
//! through [`Store::mutate`], which re-serializes the state afterwards and
//! feeds the snapshot to watchers and, once sync is enabled, to the change
//! reaction that persists and broadcasts it.

use crate::context::StoreContext;
use crate::saver::Saver;
use crate::sync::SyncState;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tandem_adapters::SyncChannel;
use tandem_core::{ApplyError, ChannelNames, ProcessRole, Serializable, StoreConfig};
use tandem_storage::{LoadError, PersistenceAdapter};
use tokio::runtime::Handle;
use tokio::sync::{watch, OnceCell};
use tracing::{debug, error, info, warn};

/// Where a store is in its load lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Loaded,
}

/// A named, typed, process-synchronized state container.
///
/// Cloning is cheap; clones share the same state.
pub struct Store<S: Serializable> {
    pub(crate) inner: Arc<StoreInner<S>>,
}

impl<S: Serializable> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Serializable> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.name)
            .field("path", &self.inner.path)
            .field("status", &self.status())
            .finish()
    }
}

pub(crate) struct StoreInner<S: Serializable> {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) role: ProcessRole,
    pub(crate) config: StoreConfig,
    pub(crate) channels: ChannelNames,
    pub(crate) channel: Arc<dyn SyncChannel>,
    pub(crate) persistence: Arc<dyn PersistenceAdapter>,
    pub(crate) saver: Saver,
    pub(crate) sync: Mutex<SyncState>,
    state: Mutex<S>,
    status: watch::Sender<LoadStatus>,
    load_once: OnceCell<()>,
    observers: watch::Sender<S::Model>,
}

impl<S: Serializable> Store<S> {
    /// Build a store over `state`. Stores are normally obtained from a
    /// [`crate::StoreRegistry`], which keeps one instance per name.
    pub(crate) fn new(name: &str, state: S, config: StoreConfig, context: &StoreContext) -> Self {
        let path = context.store_path(name);
        let initial = state.serialize();
        let inner = Arc::new(StoreInner {
            name: name.to_string(),
            channels: ChannelNames::for_path(&path),
            saver: Saver::new(name, path.clone(), Arc::clone(&context.persistence)),
            path,
            role: context.role,
            config,
            channel: Arc::clone(&context.channel),
            persistence: Arc::clone(&context.persistence),
            sync: Mutex::new(SyncState::default()),
            state: Mutex::new(state),
            status: watch::Sender::new(LoadStatus::Unloaded),
            load_once: OnceCell::new(),
            observers: watch::Sender::new(initial),
        });
        let store = Self { inner };
        if store.inner.config.auto_load {
            store.spawn_load();
        }
        store
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Absolute path of the persisted document
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn role(&self) -> ProcessRole {
        self.inner.role
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn status(&self) -> LoadStatus {
        *self.inner.status.borrow()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    /// Load persisted state, then enable sync if configured.
    ///
    /// Runs at most once; later and concurrent calls share the first
    /// successful load. A failed load leaves the store unloaded and may be
    /// retried.
    pub async fn load(&self) -> Result<(), LoadError> {
        self.inner
            .load_once
            .get_or_try_init(|| Arc::clone(&self.inner).load_from_disk())
            .await?;
        Ok(())
    }

    /// Resolve once the store has loaded
    pub async fn when_loaded(&self) {
        let mut status = self.inner.status.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = status.wait_for(|s| *s == LoadStatus::Loaded).await;
    }

    /// Change the state, then publish the result.
    ///
    /// `f` runs under the store's lock and must not call back into this
    /// store.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let out = f(&mut self.inner.lock_state());
        self.inner.notify_change();
        out
    }

    /// Read the live state
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.lock_state())
    }

    /// The current serialized model
    pub fn snapshot(&self) -> S::Model {
        self.inner.lock_state().serialize()
    }

    /// Replace the state with `model` and publish it like a mutation.
    ///
    /// A rejected model leaves the state as it was.
    pub fn deserialize(&self, model: S::Model) -> Result<(), ApplyError> {
        self.inner.apply_model(model)
    }

    /// Receiver that observes every distinct snapshot
    pub fn watch(&self) -> watch::Receiver<S::Model> {
        self.inner.observers.subscribe()
    }

    /// Start persisting and exchanging changes. No-op if already enabled or
    /// the store has not loaded.
    pub fn enable_sync(&self) {
        self.inner.enable_sync();
    }

    /// Stop reacting to local changes and remove the inbound listener
    pub fn disable_sync(&self) {
        self.inner.disable_sync();
    }

    pub fn is_sync_enabled(&self) -> bool {
        self.inner.is_sync_enabled()
    }

    /// Run `f` with sync disabled, then re-enable it if the store is
    /// configured to sync. Changes made by `f` are neither persisted nor
    /// broadcast.
    pub fn apply_without_sync<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        self.inner.apply_without_sync(|| f(self))
    }

    /// Emit a change still held back by the debounce window
    pub fn flush_sync(&self) {
        if let Some(reaction) = self.inner.active_reaction() {
            reaction.flush();
        }
    }

    /// Resolve once every save queued so far has reached the persistence
    /// adapter
    pub async fn saved(&self) {
        self.inner.saver.idle().await;
    }

    fn spawn_load(&self) {
        let store = self.clone();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    // Failures are logged by the load itself
                    let _ = store.load().await;
                });
            }
            Err(_) => warn!(store = %self.inner.name, "no async runtime, auto load skipped"),
        }
    }
}

impl<S: Serializable> StoreInner<S> {
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, S> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn is_loaded(&self) -> bool {
        *self.status.borrow() == LoadStatus::Loaded
    }

    /// Current snapshot as JSON, or `None` if the model does not encode
    pub(crate) fn snapshot_value(&self) -> Option<Value> {
        let model = self.lock_state().serialize();
        match serde_json::to_value(&model) {
            Ok(value) => Some(value),
            Err(e) => {
                error!(store = %self.name, error = %e, "failed to encode model");
                None
            }
        }
    }

    async fn load_from_disk(self: Arc<Self>) -> Result<(), LoadError> {
        self.status.send_replace(LoadStatus::Loading);
        let result = match self.read_persisted().await {
            Ok(model) => self.apply_model(model).map_err(LoadError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(store = %self.name, path = %self.path.display(), "store loaded");
                self.status.send_replace(LoadStatus::Loaded);
                if self.config.sync_enabled {
                    self.enable_sync();
                }
                Ok(())
            }
            Err(e) => {
                error!(store = %self.name, error = %e, "failed to load store");
                self.status.send_replace(LoadStatus::Unloaded);
                Err(e)
            }
        }
    }

    async fn read_persisted(&self) -> Result<S::Model, LoadError> {
        let persistence = Arc::clone(&self.persistence);
        let path = self.path.clone();
        let read = tokio::task::spawn_blocking(move || persistence.read(&path))
            .await
            .map_err(|e| LoadError::Io {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            })?;

        match read {
            Ok(document) => serde_json::from_value(document).map_err(|e| LoadError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
            Err(LoadError::NotFound { .. }) => {
                debug!(store = %self.name, "nothing persisted, starting from defaults");
                Ok(S::Model::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply an incoming JSON model
    pub(crate) fn apply_value(&self, value: Value) -> Result<(), ApplyError> {
        let model: S::Model = serde_json::from_value(value)?;
        self.apply_model(model)
    }

    /// Deserialize `model` into the state, restoring the previous state if
    /// the store rejects it
    pub(crate) fn apply_model(&self, model: S::Model) -> Result<(), ApplyError> {
        {
            let mut state = self.lock_state();
            let previous = state.serialize();
            if let Err(e) = state.deserialize(model) {
                if let Err(restore) = state.deserialize(previous) {
                    error!(store = %self.name, error = %restore, "failed to restore state");
                }
                return Err(e);
            }
        }
        self.notify_change();
        Ok(())
    }

    /// Publish the current snapshot to watchers and the change reaction
    pub(crate) fn notify_change(&self) {
        let model = self.lock_state().serialize();
        let reaction = self.active_reaction();

        if let Some(reaction) = reaction {
            match serde_json::to_value(&model) {
                Ok(value) => reaction.observe(value),
                Err(e) => error!(store = %self.name, error = %e, "failed to encode model"),
            }
        }

        self.observers.send_if_modified(|current| {
            if *current == model {
                return false;
            }
            *current = model;
            true
        });
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
