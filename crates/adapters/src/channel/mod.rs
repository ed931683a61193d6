// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named broadcast channels between processes

mod local;
mod noop;

pub use local::LocalBus;
pub use noop::NoOpChannel;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeChannel;

use serde_json::Value;
use std::sync::Arc;
use tandem_core::Disposer;

/// Invoked with the model of every message on a subscribed channel
pub type MessageHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Transport for sync messages.
///
/// Delivery is best effort and in order per sender. Handlers must not be
/// invoked after their disposer has returned.
pub trait SyncChannel: Send + Sync + 'static {
    /// Send `model` to every subscriber of `channel` in the other process(es)
    fn broadcast(&self, channel: &str, model: &Value);

    /// Register `handler` for `channel`; disposing the result removes only
    /// this registration
    fn subscribe(&self, channel: &str, handler: MessageHandler) -> Disposer;
}

impl<C: SyncChannel + ?Sized> SyncChannel for Arc<C> {
    fn broadcast(&self, channel: &str, model: &Value) {
        (**self).broadcast(channel, model)
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) -> Disposer {
        (**self).subscribe(channel, handler)
    }
}
