// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op channel for processes with no peers.

use super::{MessageHandler, SyncChannel};
use serde_json::Value;
use tandem_core::Disposer;

/// Channel that drops every message and never delivers any.
///
/// Used for read-only access to a store where no other process is running.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpChannel;

impl NoOpChannel {
    pub fn new() -> Self {
        Self
    }
}

impl SyncChannel for NoOpChannel {
    fn broadcast(&self, _channel: &str, _model: &Value) {}

    fn subscribe(&self, _channel: &str, _handler: MessageHandler) -> Disposer {
        Disposer::noop()
    }
}
