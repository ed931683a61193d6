// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced channel wrapper for consistent observability

use crate::channel::{MessageHandler, SyncChannel};
use serde_json::Value;
use std::sync::Arc;
use tandem_core::Disposer;

/// Wrapper that adds tracing to any SyncChannel
#[derive(Clone)]
pub struct TracedChannel<C> {
    inner: C,
}

impl<C> TracedChannel<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: SyncChannel> SyncChannel for TracedChannel<C> {
    fn broadcast(&self, channel: &str, model: &Value) {
        let span = tracing::debug_span!("channel.broadcast", channel);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        self.inner.broadcast(channel, model);
        tracing::debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            "broadcast sent"
        );
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) -> Disposer {
        let span = tracing::debug_span!("channel.subscribe", channel);
        let _guard = span.enter();

        let name = channel.to_string();
        let traced: MessageHandler = Arc::new(move |model| {
            tracing::trace!(channel = %name, "message received");
            handler(model);
        });
        let inner = self.inner.subscribe(channel, traced);
        tracing::debug!("subscribed");

        let name = channel.to_string();
        Disposer::new(move || {
            inner.dispose();
            tracing::debug!(channel = %name, "unsubscribed");
        })
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
