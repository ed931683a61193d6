// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Follow a store from a subordinate process

use crate::document::{render, Document};
use crate::env::Env;
use anyhow::{Context, Result};
use std::sync::Arc;
use tandem_adapters::{IpcClient, TracedChannel};
use tandem_engine::{ProcessRole, StoreContext, StoreRegistry};

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Store name
    store: String,

    /// Exit after this many updates
    #[arg(long)]
    count: Option<usize>,
}

pub async fn handle(env: &Env, args: WatchArgs) -> Result<()> {
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
    let store = registry.get_or_create(
        &args.store,
        env.config.store_config(&args.store).sync_enabled(true),
        Document::default,
    )?;
    store
        .load()
        .await
        .with_context(|| format!("failed to load store {}", args.store))?;

    let mut updates = store.watch();
    println!("{}", render(&updates.borrow_and_update()));

    let mut seen = 0;
    while args.count.map_or(true, |count| seen < count) {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render(&updates.borrow_and_update()));
                seen += 1;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    registry.shutdown().await;
    client.close().await;
    Ok(())
}
