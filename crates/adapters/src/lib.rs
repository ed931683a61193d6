// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Sync channel transports for Tandem stores

pub mod channel;
pub mod ipc;
pub mod traced;

pub use channel::{LocalBus, MessageHandler, NoOpChannel, SyncChannel};
pub use ipc::{IpcClient, IpcError, IpcHub};
pub use traced::TracedChannel;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use channel::FakeChannel;
