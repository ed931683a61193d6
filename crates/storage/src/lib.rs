// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Persistence for Tandem stores: one JSON document per store

mod file;
mod json;
mod persistence;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use file::write_file;
pub use json::{store_path, JsonFileStore};
pub use persistence::{LoadError, PersistenceAdapter, WriteError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePersistence, PersistenceCall};
