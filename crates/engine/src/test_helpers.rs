// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine unit tests

use crate::context::StoreContext;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tandem_adapters::FakeChannel;
use tandem_core::{ApplyError, ProcessRole, Serializable, StoreConfig};
use tandem_storage::FakePersistence;

pub const BASE_DIR: &str = "/data/tandem";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsModel {
    pub theme: String,
    pub x: i64,
    pub tags: Vec<String>,
}

/// Test store counting how often a model was applied
#[derive(Debug, Default)]
pub struct Prefs {
    pub theme: String,
    pub x: i64,
    pub tags: Vec<String>,
    pub applied: usize,
}

impl Serializable for Prefs {
    type Model = PrefsModel;

    fn serialize(&self) -> PrefsModel {
        PrefsModel {
            theme: self.theme.clone(),
            x: self.x,
            tags: self.tags.clone(),
        }
    }

    fn deserialize(&mut self, model: PrefsModel) -> Result<(), ApplyError> {
        if model.x < 0 {
            return Err(ApplyError::Rejected(format!("x must not be negative, got {}", model.x)));
        }
        self.theme = model.theme;
        self.x = model.x;
        self.tags = model.tags;
        self.applied += 1;
        Ok(())
    }
}

pub struct Harness {
    pub channel: FakeChannel,
    pub persistence: FakePersistence,
    pub context: StoreContext,
}

impl Harness {
    pub fn new(role: ProcessRole) -> Self {
        let channel = FakeChannel::new();
        let persistence = FakePersistence::new();
        let context = StoreContext::new(BASE_DIR, role, Arc::new(channel.clone()))
            .with_persistence(Arc::new(persistence.clone()));
        Self {
            channel,
            persistence,
            context,
        }
    }

    pub fn store(&self, config: StoreConfig) -> Store<Prefs> {
        Store::new("prefs", Prefs::default(), config, &self.context)
    }

    /// A store that has finished loading
    pub async fn loaded(&self, config: StoreConfig) -> Store<Prefs> {
        let store = self.store(config);
        store.load().await.unwrap();
        store
    }
}
