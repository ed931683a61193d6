// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake persistence adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::persistence::{LoadError, PersistenceAdapter, WriteError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded persistence call
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceCall {
    Read { path: PathBuf },
    Write { path: PathBuf, model: Value },
}

#[derive(Default)]
struct FakeState {
    documents: HashMap<PathBuf, Value>,
    calls: Vec<PersistenceCall>,
    fail_writes: bool,
}

/// In-memory persistence that records every call
#[derive(Clone, Default)]
pub struct FakePersistence {
    inner: Arc<Mutex<FakeState>>,
}

impl FakePersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document as if it were already on disk
    pub fn insert(&self, path: impl Into<PathBuf>, document: Value) {
        self.lock().documents.insert(path.into(), document);
    }

    pub fn document(&self, path: &Path) -> Option<Value> {
        self.lock().documents.get(path).cloned()
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn calls(&self) -> Vec<PersistenceCall> {
        self.lock().calls.clone()
    }

    /// Models written, in order
    pub fn writes(&self) -> Vec<Value> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                PersistenceCall::Write { model, .. } => Some(model.clone()),
                PersistenceCall::Read { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PersistenceAdapter for FakePersistence {
    fn read(&self, path: &Path) -> Result<Value, LoadError> {
        let mut state = self.lock();
        state.calls.push(PersistenceCall::Read {
            path: path.to_path_buf(),
        });
        state
            .documents
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: path.to_path_buf(),
            })
    }

    fn write(&self, path: &Path, model: &Value) -> Result<(), WriteError> {
        let mut state = self.lock();
        state.calls.push(PersistenceCall::Write {
            path: path.to_path_buf(),
            model: model.clone(),
        });
        if state.fail_writes {
            return Err(WriteError::WriteFailed {
                path: path.to_path_buf(),
                source: io::Error::other("injected write failure"),
            });
        }
        let Value::Object(fields) = model else {
            return Err(WriteError::NotAnObject {
                path: path.to_path_buf(),
            });
        };
        let document = state
            .documents
            .entry(path.to_path_buf())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(existing) = document {
            for (key, value) in fields {
                existing.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
