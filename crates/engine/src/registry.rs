// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One store instance per name within a process

use crate::context::StoreContext;
use crate::error::RegistryError;
use crate::saver::Saver;
use crate::store::Store;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tandem_core::{Serializable, StoreConfig};
use tracing::debug;

/// Type-erased view of a registered store
trait ManagedStore: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn flush_sync(&self);
    fn disable_sync(&self);
    fn saver(&self) -> Saver;
    fn as_any(&self) -> &dyn Any;
}

impl<S: Serializable> ManagedStore for Store<S> {
    fn type_name(&self) -> &'static str {
        type_name::<S>()
    }

    fn flush_sync(&self) {
        Store::flush_sync(self);
    }

    fn disable_sync(&self) {
        Store::disable_sync(self);
    }

    fn saver(&self) -> Saver {
        self.inner.saver.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Creates stores on first request and hands out the same instance after
pub struct StoreRegistry {
    context: StoreContext,
    stores: Mutex<HashMap<String, Arc<dyn ManagedStore>>>,
}

impl StoreRegistry {
    pub fn new(context: StoreContext) -> Self {
        Self {
            context,
            stores: Mutex::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &StoreContext {
        &self.context
    }

    /// The store registered as `name`, creating it from `init` and `config`
    /// on first use. Later calls ignore both and return the existing store.
    pub fn get_or_create<S: Serializable>(
        &self,
        name: &str,
        config: StoreConfig,
        init: impl FnOnce() -> S,
    ) -> Result<Store<S>, RegistryError> {
        validate_name(name)?;
        let mut stores = self.lock();
        if let Some(existing) = stores.get(name) {
            return downcast(name, existing.as_ref());
        }

        let store = Store::new(name, init(), config, &self.context);
        stores.insert(name.to_string(), Arc::new(store.clone()));
        debug!(store = name, role = %self.context.role, "store registered");
        Ok(store)
    }

    /// The store registered as `name`, if any
    pub fn get<S: Serializable>(&self, name: &str) -> Result<Option<Store<S>>, RegistryError> {
        let stores = self.lock();
        match stores.get(name) {
            Some(existing) => downcast(name, existing.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Registered store names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Emit pending debounced changes, disable sync on every store and
    /// forget them, then wait for queued saves to finish
    pub async fn shutdown(&self) {
        let stores: Vec<(String, Arc<dyn ManagedStore>)> = self.lock().drain().collect();
        let mut savers = Vec::with_capacity(stores.len());
        for (name, store) in stores {
            store.flush_sync();
            store.disable_sync();
            savers.push(store.saver());
            debug!(store = %name, "store released");
        }
        for saver in savers {
            saver.idle().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn ManagedStore>>> {
        self.stores.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn downcast<S: Serializable>(name: &str, store: &dyn ManagedStore) -> Result<Store<S>, RegistryError> {
    store
        .as_any()
        .downcast_ref::<Store<S>>()
        .cloned()
        .ok_or_else(|| RegistryError::TypeMismatch {
            name: name.to_string(),
            registered: store.type_name(),
            requested: type_name::<S>(),
        })
}

/// Store names become file names
fn validate_name(name: &str) -> Result<(), RegistryError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
