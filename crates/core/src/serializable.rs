// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability a concrete store type supplies

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors applying a model to a store
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("model does not match store schema: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model rejected: {0}")]
    Rejected(String),
}

/// State that can be captured as a JSON model and restored from one.
///
/// Implementations must satisfy the round-trip law: after
/// `s.deserialize(s.serialize())` the state is observably unchanged.
/// The model's serde derive is the store's schema; its top-level fields are
/// the keys written to the persisted document.
pub trait Serializable: Send + 'static {
    type Model: Serialize
        + DeserializeOwned
        + Clone
        + PartialEq
        + Default
        + Send
        + Sync
        + 'static;

    fn serialize(&self) -> Self::Model;

    /// Replace the state with `model`. This is the only way merged and
    /// loaded data enters a store.
    fn deserialize(&mut self, model: Self::Model) -> Result<(), ApplyError>;
}

#[cfg(test)]
#[path = "serializable_tests.rs"]
mod tests;
