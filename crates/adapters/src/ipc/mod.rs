// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix domain socket transport between processes
//!
//! The authoritative process runs an `IpcHub`; each subordinate process
//! connects with an `IpcClient`. Both sides implement `SyncChannel`.

mod client;
mod hub;
pub mod protocol;

pub use client::IpcClient;
pub use hub::IpcHub;
pub use protocol::ProtocolError;

use std::path::PathBuf;
use thiserror::Error;

/// Errors establishing an IPC connection
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("failed to bind {}: {source}", .path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("another hub is already listening on {}", .path.display())]
    AlreadyRunning { path: PathBuf },
    #[error("failed to connect to {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
#[path = "ipc_tests.rs"]
mod tests;
