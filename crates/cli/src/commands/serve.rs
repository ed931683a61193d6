// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authoritative process: owns the documents and the IPC hub

use crate::document::Document;
use crate::env::Env;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tandem_adapters::{IpcHub, SyncChannel, TracedChannel};
use tandem_core::{SyncDirection, SyncMessage};
use tandem_engine::{ProcessRole, StoreContext, StoreRegistry};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Store to load at startup (repeatable)
    #[arg(long = "store", value_name = "NAME")]
    stores: Vec<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn handle(env: &Env, args: ServeArgs) -> Result<()> {
    let socket = env.socket_path();
    let hub = Arc::new(IpcHub::bind(&socket).await?);
    let mut unrouted = hub.unrouted();
    let channel: Arc<dyn SyncChannel> = Arc::new(TracedChannel::new(Arc::clone(&hub)));
    let registry = StoreRegistry::new(StoreContext::new(
        &env.data_dir,
        ProcessRole::Authoritative,
        channel,
    ));

    for name in store_names(env, &args.stores)? {
        host(env, &registry, &name).await?;
    }

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        socket = %socket.display(),
        stores = ?registry.names(),
        "serving"
    );
    // Signal ready for whoever started us
    println!("READY");

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
            Some(message) = unrouted.recv() => {
                host_unrouted(env, &registry, &hub, message).await;
            }
        }
    }

    registry.shutdown().await;
    hub.shutdown();
    info!("stopped");
    Ok(())
}

/// Register and load `name`
async fn host(env: &Env, registry: &StoreRegistry, name: &str) -> Result<()> {
    let store = registry.get_or_create(name, env.config.store_config(name), Document::default)?;
    store
        .load()
        .await
        .with_context(|| format!("failed to load store {name}"))
}

/// A subordinate wrote to a store nobody has loaded yet: load it, then
/// replay the message to it
async fn host_unrouted(env: &Env, registry: &StoreRegistry, hub: &IpcHub, message: SyncMessage) {
    let Some(name) = store_for_channel(registry.context().base_dir(), &message.channel) else {
        warn!(channel = %message.channel, "no store for channel, message dropped");
        return;
    };
    match host(env, registry, &name).await {
        Ok(()) => {
            info!(store = %name, "hosting store on first write");
            hub.deliver(&message.channel, &message.model);
        }
        Err(e) => warn!(store = %name, error = %format!("{e:#}"), "message dropped"),
    }
}

/// The store a subordinate's outbound channel refers to, if it lives
/// directly in `base_dir`
fn store_for_channel(base_dir: &Path, channel: &str) -> Option<String> {
    let (direction, path) = SyncDirection::parse(channel)?;
    if direction != SyncDirection::ToAuthoritative
        || path.parent() != Some(base_dir)
        || path.extension() != Some(OsStr::new("json"))
    {
        return None;
    }
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(str::to_string)
}

/// Stores named on the command line, in the config, or already on disk
fn store_names(env: &Env, requested: &[String]) -> Result<BTreeSet<String>> {
    let mut names: BTreeSet<String> = requested.iter().cloned().collect();
    names.extend(env.config.stores.keys().cloned());

    let entries = match std::fs::read_dir(&env.data_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to list {}", env.data_dir.display()))
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension() != Some(OsStr::new("json")) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
            names.insert(stem.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
#[path = "serve_tests.rs"]
mod tests;
