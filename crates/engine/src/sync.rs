// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process sync for a loaded store
//!
//! While enabled, a store owns two resources: a change reaction that writes
//! (authoritative only) and broadcasts each distinct snapshot, and a listener
//! on its inbound channel that merges peers' models. Both are tracked as
//! disposers so disabling releases them together.
//!
//! A subordinate applies messages from the authoritative process with sync
//! disabled. The merge therefore never produces an outbound message, which
//! keeps two processes from echoing the same model back and forth.

use crate::store::StoreInner;
use serde_json::Value;
use std::sync::{Arc, MutexGuard};
use tandem_adapters::MessageHandler;
use tandem_core::{ChangeHandler, DisposerSet, ProcessRole, Reaction, Serializable, SyncDirection};
use tracing::{debug, error, trace};

/// Resources held while sync is enabled
#[derive(Default)]
pub(crate) struct SyncState {
    enabled: bool,
    disposers: DisposerSet,
    reaction: Option<Reaction>,
}

impl<S: Serializable> StoreInner<S> {
    fn lock_sync(&self) -> MutexGuard<'_, SyncState> {
        self.sync.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn is_sync_enabled(&self) -> bool {
        self.lock_sync().enabled
    }

    pub(crate) fn active_reaction(&self) -> Option<Reaction> {
        self.lock_sync().reaction.clone()
    }

    pub(crate) fn enable_sync(self: &Arc<Self>) {
        if !self.is_loaded() {
            debug!(store = %self.name, "sync not enabled, store is not loaded");
            return;
        }
        if self.is_sync_enabled() {
            return;
        }
        let Some(baseline) = self.snapshot_value() else {
            return;
        };

        let weak = Arc::downgrade(self);
        let on_change: ChangeHandler = Arc::new(move |model| {
            if let Some(inner) = weak.upgrade() {
                inner.on_model_change(model);
            }
        });
        let reaction = Reaction::new(baseline, &self.config.sync_options, on_change);

        let weak = Arc::downgrade(self);
        let role = self.role;
        let on_message: MessageHandler = Arc::new(move |model: &Value| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match role {
                ProcessRole::Authoritative => inner.on_sync(model.clone()),
                ProcessRole::Subordinate => inner.on_sync_from_main(model.clone()),
            }
        });
        let inbound = self.channels.get(SyncDirection::inbound(self.role)).to_string();

        {
            let mut sync = self.lock_sync();
            if sync.enabled {
                return;
            }
            sync.disposers.push(reaction.disposer());
            sync.disposers.push(self.channel.subscribe(&inbound, on_message));
            sync.reaction = Some(reaction.clone());
            sync.enabled = true;
        }
        debug!(store = %self.name, channel = %inbound, "sync enabled");

        // Catch a mutation that landed between the baseline and registration
        if let Some(current) = self.snapshot_value() {
            reaction.observe(current);
        }
    }

    pub(crate) fn disable_sync(&self) {
        let mut disposers = {
            let mut sync = self.lock_sync();
            if !sync.enabled {
                return;
            }
            sync.enabled = false;
            sync.reaction = None;
            std::mem::take(&mut sync.disposers)
        };
        disposers.dispose_all();
        debug!(store = %self.name, "sync disabled");
    }

    pub(crate) fn apply_without_sync<R>(self: &Arc<Self>, f: impl FnOnce() -> R) -> R {
        self.disable_sync();
        let out = f();
        if self.config.sync_enabled {
            self.enable_sync();
        }
        out
    }

    /// A local change survived the reaction's equality check and filter
    fn on_model_change(&self, model: Value) {
        if !self.is_loaded() {
            return;
        }
        let outbound = self.channels.get(SyncDirection::outbound(self.role));
        if self.role.may_persist() {
            self.saver.save(model.clone());
        }
        self.channel.broadcast(outbound, &model);
    }

    /// Merge a model received from a peer
    fn on_sync(&self, model: Value) {
        if self.snapshot_value().as_ref() == Some(&model) {
            trace!(store = %self.name, "already in sync");
            return;
        }
        if let Err(e) = self.apply_value(model) {
            error!(store = %self.name, error = %e, "dropped sync message");
        }
    }

    fn on_sync_from_main(self: &Arc<Self>, model: Value) {
        self.apply_without_sync(|| self.on_sync(model));
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
