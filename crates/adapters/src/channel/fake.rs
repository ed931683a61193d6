// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake channel for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LocalBus, MessageHandler, SyncChannel};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tandem_core::{Disposer, SyncMessage};

/// Channel that records outbound messages and lets tests inject inbound ones
#[derive(Clone, Default)]
pub struct FakeChannel {
    sent: Arc<Mutex<Vec<SyncMessage>>>,
    inbound: LocalBus,
}

impl FakeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded broadcasts
    pub fn broadcasts(&self) -> Vec<SyncMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Models broadcast on one channel, in order
    pub fn broadcasts_on(&self, channel: &str) -> Vec<Value> {
        self.broadcasts()
            .into_iter()
            .filter(|m| m.channel == channel)
            .map(|m| m.model)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Deliver a message as if it came from another process
    pub fn deliver(&self, channel: &str, model: &Value) {
        self.inbound.broadcast(channel, model);
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.inbound.subscriber_count(channel)
    }
}

impl SyncChannel for FakeChannel {
    fn broadcast(&self, channel: &str, model: &Value) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SyncMessage::new(channel, model.clone()));
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) -> Disposer {
        self.inbound.subscribe(channel, handler)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
