// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tandem-core: Core types for the Tandem synchronized store
//!
//! This crate provides:
//! - Process roles and channel naming for cross-process sync
//! - Disposers for releasing subscriptions and reactions
//! - The change reaction engine (diffing, debounce, filtering)
//! - Store configuration and the `Serializable` capability

pub mod channel;
pub mod config;
pub mod disposer;
pub mod reaction;
pub mod role;
pub mod serializable;

// Re-exports
pub use channel::{ChannelNames, SyncDirection, SyncMessage};
pub use config::{ConfigError, StoreConfig, StoreSettings, SyncFilter, SyncOptions, TandemConfig};
pub use disposer::{Disposer, DisposerSet};
pub use reaction::{ChangeHandler, Reaction};
pub use role::ProcessRole;
pub use serializable::{ApplyError, Serializable};
