// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process bus routing messages to channel subscribers

use super::{MessageHandler, SyncChannel};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tandem_core::Disposer;

type Subscribers = HashMap<String, Vec<Subscriber>>;

struct Subscriber {
    id: u64,
    handler: MessageHandler,
    /// Cleared on dispose so an in-flight broadcast skips this handler
    active: Arc<AtomicBool>,
}

/// Routes each broadcast to every handler subscribed to its channel name.
///
/// Handlers are invoked synchronously on the broadcasting thread, outside
/// the subscriber lock, so a handler may subscribe or dispose freely.
pub struct LocalBus {
    subscribers: Arc<RwLock<Subscribers>>,
    next_id: Arc<AtomicU64>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get count of active subscribers on a channel
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(channel)
            .map_or(0, Vec::len)
    }

    /// List channels with at least one subscriber
    pub fn channels(&self) -> Vec<String> {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl SyncChannel for LocalBus {
    fn broadcast(&self, channel: &str, model: &Value) {
        let targets: Vec<(MessageHandler, Arc<AtomicBool>)> = {
            let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
            match subs.get(channel) {
                Some(list) => list
                    .iter()
                    .map(|s| (Arc::clone(&s.handler), Arc::clone(&s.active)))
                    .collect(),
                None => return,
            }
        };

        for (handler, active) in targets {
            if active.load(Ordering::SeqCst) {
                handler(model);
            }
        }
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) -> Disposer {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let active = Arc::new(AtomicBool::new(true));

        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(channel.to_string())
            .or_default()
            .push(Subscriber {
                id,
                handler,
                active: Arc::clone(&active),
            });

        let subscribers = Arc::downgrade(&self.subscribers);
        let channel = channel.to_string();
        Disposer::new(move || {
            active.store(false, Ordering::SeqCst);
            let Some(subscribers) = subscribers.upgrade() else {
                return;
            };
            let mut subs = subscribers.write().unwrap_or_else(|e| e.into_inner());
            if let Some(list) = subs.get_mut(&channel) {
                list.retain(|s| s.id != id);
                if list.is_empty() {
                    subs.remove(&channel);
                }
            }
        })
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LocalBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
