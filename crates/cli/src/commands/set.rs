// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change one field through the authoritative process

use crate::document::Document;
use crate::env::Env;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tandem_adapters::{IpcClient, TracedChannel};
use tandem_engine::{ProcessRole, StoreConfig, StoreContext, StoreRegistry};

#[derive(clap::Args)]
pub struct SetArgs {
    /// Store name
    store: String,
    /// Top-level field to set
    key: String,
    /// JSON value; anything that does not parse is taken as a string
    value: String,
}

pub async fn handle(env: &Env, args: SetArgs) -> Result<()> {
    let socket = env.socket_path();
    let client = Arc::new(
        IpcClient::connect(&socket)
            .await
            .context("is `tandem serve` running?")?,
    );
    let registry = StoreRegistry::new(StoreContext::new(
        &env.data_dir,
        ProcessRole::Subordinate,
        Arc::new(TracedChannel::new(Arc::clone(&client))),
    ));

    // Configured debounce is ignored: this process exits right after the send
    let store = registry.get_or_create(&args.store, StoreConfig::new(), Document::default)?;
    store
        .load()
        .await
        .with_context(|| format!("failed to load store {}", args.store))?;

    let value = parse_value(&args.value);
    store.mutate(|doc| doc.set(&args.key, value.clone()));

    registry.shutdown().await;
    client.close().await;

    println!("{}.{} = {}", args.store, args.key, value);
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
#[path = "set_tests.rs"]
mod tests;
