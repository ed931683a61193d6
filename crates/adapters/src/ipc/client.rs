// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connecting side of the socket transport

use super::protocol::{self, ProtocolError};
use super::IpcError;
use crate::channel::{LocalBus, MessageHandler, SyncChannel};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tandem_core::{Disposer, SyncMessage};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Connection from a subordinate process to the hub
pub struct IpcClient {
    socket_path: PathBuf,
    bus: LocalBus,
    outbound: Mutex<Option<mpsc::UnboundedSender<SyncMessage>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl IpcClient {
    pub async fn connect(path: &Path) -> Result<Self, IpcError> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(|source| IpcError::Connect {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "connected to hub");

        let (mut read_half, mut write_half) = stream.into_split();
        let (tx, mut rx) = mpsc::unbounded_channel::<SyncMessage>();
        let bus = LocalBus::new();

        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(e) = protocol::write_frame(&mut write_half, &message).await {
                    warn!(error = %e, "failed to send to hub");
                    break;
                }
            }
        });

        let inbound = bus.clone();
        let reader = tokio::spawn(async move {
            loop {
                match protocol::read_frame(&mut read_half).await {
                    Ok(message) => inbound.broadcast(&message.channel, &message.model),
                    Err(ProtocolError::ConnectionClosed) => {
                        debug!("hub closed connection");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "hub connection failed");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            socket_path: path.to_path_buf(),
            bus,
            outbound: Mutex::new(Some(tx)),
            writer: Mutex::new(Some(writer)),
            reader: Mutex::new(Some(reader)),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Whether the hub side of the connection is still open
    pub fn is_connected(&self) -> bool {
        self.reader
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Send every queued message, then close the connection
    pub async fn close(&self) {
        drop(
            self.outbound
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .take(),
        );
        let writer = self.writer.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(writer) = writer {
            let _ = writer.await;
        }
        if let Some(reader) = self.reader.lock().unwrap_or_else(|e| e.into_inner()).take() {
            reader.abort();
        }
    }
}

impl Drop for IpcClient {
    fn drop(&mut self) {
        for slot in [&self.writer, &self.reader] {
            if let Some(task) = slot.lock().unwrap_or_else(|e| e.into_inner()).take() {
                task.abort();
            }
        }
    }
}

impl SyncChannel for IpcClient {
    fn broadcast(&self, channel: &str, model: &Value) {
        let outbound = self.outbound.lock().unwrap_or_else(|e| e.into_inner());
        let sent = outbound
            .as_ref()
            .is_some_and(|tx| tx.send(SyncMessage::new(channel, model.clone())).is_ok());
        if !sent {
            warn!(channel, "connection closed, dropping message");
        }
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) -> Disposer {
        self.bus.subscribe(channel, handler)
    }
}
