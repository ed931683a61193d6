// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the store registry

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid store name: {0:?}")]
    InvalidName(String),
    #[error("store {name} is registered as {registered}, not {requested}")]
    TypeMismatch {
        name: String,
        registered: &'static str,
        requested: &'static str,
    },
}
