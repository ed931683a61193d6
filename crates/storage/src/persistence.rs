// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence adapter trait and errors

use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tandem_core::ApplyError;
use thiserror::Error;

/// Errors loading a persisted store
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing persisted yet; callers start from the default model
    #[error("no persisted store at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("corrupt store at {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store rejected persisted model: {0}")]
    Rejected(#[from] ApplyError),
}

/// Errors writing a store's model to disk
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("model for {} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("failed to encode model: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reads and writes a store's JSON document
pub trait PersistenceAdapter: Send + Sync {
    /// Read the whole document at `path`
    fn read(&self, path: &Path) -> Result<Value, LoadError>;

    /// Set every top-level field of `model` on the document at `path`.
    /// Keys the model does not mention are left as they are.
    fn write(&self, path: &Path, model: &Value) -> Result<(), WriteError>;
}
