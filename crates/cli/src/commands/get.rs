// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read a store document straight from disk

use crate::document::{render, Document};
use crate::env::Env;
use anyhow::{Context, Result};
use std::sync::Arc;
use tandem_adapters::NoOpChannel;
use tandem_engine::{ProcessRole, StoreConfig, StoreContext, StoreRegistry};

#[derive(clap::Args)]
pub struct GetArgs {
    /// Store name
    store: String,
}

pub async fn handle(env: &Env, args: GetArgs) -> Result<()> {
    // A subordinate never writes, so reading cannot touch the file
    let registry = StoreRegistry::new(StoreContext::new(
        &env.data_dir,
        ProcessRole::Subordinate,
        Arc::new(NoOpChannel::new()),
    ));
    let store = registry.get_or_create(
        &args.store,
        StoreConfig::new().sync_enabled(false),
        Document::default,
    )?;
    store
        .load()
        .await
        .with_context(|| format!("failed to load store {}", args.store))?;

    println!("{}", render(&store.snapshot()));
    Ok(())
}
