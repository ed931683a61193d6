// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Tandem store engine
//!
//! A `Store` is a typed, named state container that loads from disk, and
//! once loaded keeps itself in sync with the same store in other processes.
//! Stores are created through a `StoreRegistry`, which guarantees a single
//! instance per name.

mod context;
mod error;
mod registry;
mod saver;
mod store;
mod sync;

#[cfg(test)]
mod test_helpers;

pub use context::StoreContext;
pub use error::RegistryError;
pub use registry::StoreRegistry;
pub use store::{LoadStatus, Store};

pub use tandem_core::{ApplyError, ProcessRole, Serializable, StoreConfig, SyncOptions};
pub use tandem_storage::LoadError;
