// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based persistence

use crate::file::write_file;
use crate::persistence::{LoadError, PersistenceAdapter, WriteError};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Path of the document backing the store called `name`
pub fn store_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir.join(format!("{}.json", name))
}

/// Stores each model as a pretty-printed JSON object on disk
#[derive(Clone, Debug, Default)]
pub struct JsonFileStore;

impl JsonFileStore {
    pub fn new() -> Self {
        Self
    }

    /// Existing document to merge into; unreadable content is replaced
    fn existing_document(&self, path: &Path) -> Map<String, Value> {
        match self.read(path) {
            Ok(Value::Object(document)) => document,
            Ok(_) => Map::new(),
            Err(LoadError::NotFound { .. }) => Map::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "replacing unreadable document");
                Map::new()
            }
        }
    }
}

impl PersistenceAdapter for JsonFileStore {
    fn read(&self, path: &Path) -> Result<Value, LoadError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        let value: Value = serde_json::from_str(&content).map_err(|e| LoadError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(LoadError::Corrupt {
                path: path.to_path_buf(),
                reason: "top-level value is not an object".to_string(),
            });
        }
        Ok(value)
    }

    fn write(&self, path: &Path, model: &Value) -> Result<(), WriteError> {
        let Value::Object(fields) = model else {
            return Err(WriteError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        let mut document = self.existing_document(path);
        for (key, value) in fields {
            document.insert(key.clone(), value.clone());
        }

        let json = serde_json::to_vec_pretty(&Value::Object(document))?;
        write_file(path, &json).map_err(|source| WriteError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
