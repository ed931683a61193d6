// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change reaction engine
//!
//! A `Reaction` is fed every new serialized snapshot of a store and calls its
//! handler only when the snapshot differs from the last one it emitted.
//! With a debounce configured, bursts of changes collapse into a single
//! emission carrying the final snapshot once the quiet period has passed.

use crate::config::{SyncFilter, SyncOptions};
use crate::disposer::Disposer;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Receives each emitted snapshot
pub type ChangeHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Observes snapshots and emits the ones that changed
#[derive(Clone)]
pub struct Reaction {
    shared: Arc<Shared>,
}

struct Shared {
    debounce: Option<Duration>,
    filter: Option<SyncFilter>,
    handler: ChangeHandler,
    state: Mutex<ReactionState>,
}

struct ReactionState {
    /// Last snapshot handed to the handler (or the baseline)
    emitted: Value,
    /// Most recent snapshot observed
    latest: Value,
    timer: Option<JoinHandle<()>>,
    disposed: bool,
}

impl Reaction {
    /// Create a reaction whose baseline is `baseline`; observing an equal
    /// snapshot emits nothing.
    pub fn new(baseline: Value, options: &SyncOptions, handler: ChangeHandler) -> Self {
        Self {
            shared: Arc::new(Shared {
                debounce: options.debounce,
                filter: options.filter.clone(),
                handler,
                state: Mutex::new(ReactionState {
                    emitted: baseline.clone(),
                    latest: baseline,
                    timer: None,
                    disposed: false,
                }),
            }),
        }
    }

    /// Feed a new snapshot
    pub fn observe(&self, next: Value) {
        let mut state = self.lock();
        if state.disposed || state.latest == next {
            return;
        }
        state.latest = next;

        if !self.passes_filter(&state) {
            tracing::trace!("change filtered out");
            return;
        }

        let Some(delay) = self.shared.debounce else {
            drop(state);
            self.fire();
            return;
        };

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        match Handle::try_current() {
            Ok(handle) => {
                let this = self.clone();
                state.timer = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    this.fire();
                }));
            }
            Err(_) => {
                tracing::warn!("no async runtime for debounce, emitting immediately");
                drop(state);
                self.fire();
            }
        }
    }

    /// Emit a pending debounced change right away
    pub fn flush(&self) {
        if let Some(timer) = self.lock().timer.take() {
            timer.abort();
        }
        self.fire();
    }

    /// Whether an observed change that passes the filter has not been
    /// emitted yet
    pub fn has_pending(&self) -> bool {
        self.is_due(&self.lock())
    }

    /// Stop reacting. Pending debounced changes are dropped.
    pub fn dispose(&self) {
        let mut state = self.lock();
        state.disposed = true;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// A disposer that releases this reaction
    pub fn disposer(&self) -> Disposer {
        let this = self.clone();
        Disposer::new(move || this.dispose())
    }

    fn fire(&self) {
        let model = {
            let mut state = self.lock();
            if !self.is_due(&state) {
                return;
            }
            state.emitted = state.latest.clone();
            state.latest.clone()
        };
        (self.shared.handler)(model);
    }

    /// The latest snapshot differs from the emitted one in a way the filter
    /// accepts
    fn is_due(&self, state: &ReactionState) -> bool {
        !state.disposed && state.latest != state.emitted && self.passes_filter(state)
    }

    fn passes_filter(&self, state: &ReactionState) -> bool {
        match &self.shared.filter {
            Some(filter) => filter(&state.emitted, &state.latest),
            None => true,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ReactionState> {
        self.shared.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "reaction_tests.rs"]
mod tests;
