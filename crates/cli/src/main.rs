// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tandem - inspect and drive process-synchronized stores

mod commands;
mod document;
mod env;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{get, serve, set, watch};
use std::path::PathBuf;

use crate::env::Env;

#[derive(Parser)]
#[command(
    name = "tandem",
    version,
    about = "Tandem - stores kept in sync across processes"
)]
struct Cli {
    /// Directory holding the store documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/tandem.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the authoritative process
    Serve(serve::ServeArgs),
    /// Print a store document
    Get(get::GetArgs),
    /// Set one field of a store through the running server
    Set(set::SetArgs),
    /// Print a store document every time it changes
    Watch(watch::WatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Serve owns its logging setup (it may log to a file)
    let _guard = match &cli.command {
        Commands::Serve(args) => env::init_logging(args.log_file.as_deref())?,
        _ => env::init_logging(None)?,
    };

    let env = Env::resolve(cli.data_dir, cli.config)?;

    match cli.command {
        Commands::Serve(args) => serve::handle(&env, args).await,
        Commands::Get(args) => get::handle(&env, args).await,
        Commands::Set(args) => set::handle(&env, args).await,
        Commands::Watch(args) => watch::handle(&env, args).await,
    }
}
