// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema-less store used by the CLI

use serde_json::{Map, Value};
use tandem_engine::{ApplyError, Serializable};

/// A store whose model is the whole JSON document
#[derive(Debug, Default)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    pub fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }
}

impl Serializable for Document {
    type Model = Map<String, Value>;

    fn serialize(&self) -> Self::Model {
        self.fields.clone()
    }

    fn deserialize(&mut self, model: Self::Model) -> Result<(), ApplyError> {
        self.fields = model;
        Ok(())
    }
}

/// Render a document for the terminal
pub fn render(model: &Map<String, Value>) -> String {
    // A map of JSON values always encodes
    serde_json::to_string_pretty(model).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
