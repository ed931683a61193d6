// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listening side of the socket transport

use super::protocol::{self, ProtocolError};
use super::IpcError;
use crate::channel::{LocalBus, MessageHandler, SyncChannel};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tandem_core::{Disposer, SyncMessage};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type PeerSender = mpsc::UnboundedSender<SyncMessage>;
type Unrouted = Arc<Mutex<Option<mpsc::UnboundedSender<SyncMessage>>>>;

#[derive(Clone, Default)]
struct Peers {
    senders: Arc<Mutex<HashMap<u64, PeerSender>>>,
    next_id: Arc<AtomicU64>,
}

impl Peers {
    fn add(&self, sender: PeerSender) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.lock().insert(id, sender);
        id
    }

    fn remove(&self, id: u64) {
        self.lock().remove(&id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, PeerSender>> {
        self.senders.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Accepts subordinate connections and relays messages to and from them.
///
/// Inbound frames are dispatched to local subscribers; `broadcast` sends to
/// every connected peer. Frames for a channel nobody subscribes to are
/// dropped unless [`IpcHub::unrouted`] was called. Dropping the hub stops all
/// connection tasks and removes the socket file.
pub struct IpcHub {
    socket_path: PathBuf,
    bus: LocalBus,
    peers: Peers,
    unrouted: Unrouted,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl IpcHub {
    /// Bind `path` and start accepting connections.
    ///
    /// A stale socket file left by a dead process is replaced; a live one
    /// is reported as `AlreadyRunning`.
    pub async fn bind(path: &Path) -> Result<Self, IpcError> {
        if path.exists() {
            if UnixStream::connect(path).await.is_ok() {
                return Err(IpcError::AlreadyRunning {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), "removing stale socket");
            std::fs::remove_file(path).map_err(|source| IpcError::Bind {
                path: path.to_path_buf(),
                source,
            })?;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| IpcError::Bind {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let listener = UnixListener::bind(path).map_err(|source| IpcError::Bind {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "hub listening");

        let hub = Self {
            socket_path: path.to_path_buf(),
            bus: LocalBus::new(),
            peers: Peers::default(),
            unrouted: Arc::new(Mutex::new(None)),
            tasks: Arc::new(Mutex::new(Vec::new())),
        };
        let accept = tokio::spawn(accept_loop(
            listener,
            Inbound {
                bus: hub.bus.clone(),
                unrouted: Arc::clone(&hub.unrouted),
            },
            hub.peers.clone(),
            Arc::clone(&hub.tasks),
        ));
        hub.lock_tasks().push(accept);
        Ok(hub)
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Receive frames that arrive for a channel without a local subscriber.
    /// A later call replaces the earlier receiver.
    pub fn unrouted(&self) -> mpsc::UnboundedReceiver<SyncMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.unrouted.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);
        rx
    }

    /// Hand a message to local subscribers as if a peer had sent it
    pub fn deliver(&self, channel: &str, model: &Value) {
        self.bus.broadcast(channel, model);
    }

    /// Number of currently connected peers
    pub fn peer_count(&self) -> usize {
        self.peers.lock().len()
    }

    /// Stop accepting, drop all peers and remove the socket file
    pub fn shutdown(&self) {
        for task in self.lock_tasks().drain(..) {
            task.abort();
        }
        self.peers.lock().clear();
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(path = %self.socket_path.display(), error = %e, "failed to remove socket");
            }
        }
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for IpcHub {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl SyncChannel for IpcHub {
    fn broadcast(&self, channel: &str, model: &Value) {
        let message = SyncMessage::new(channel, model.clone());
        let peers = self.peers.lock();
        for sender in peers.values() {
            // A closed sender means the peer is going away; its reader
            // task removes it
            let _ = sender.send(message.clone());
        }
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) -> Disposer {
        self.bus.subscribe(channel, handler)
    }
}

/// Where frames read from peers go
#[derive(Clone)]
struct Inbound {
    bus: LocalBus,
    unrouted: Unrouted,
}

impl Inbound {
    fn dispatch(&self, message: SyncMessage) {
        if self.bus.subscriber_count(&message.channel) > 0 {
            self.bus.broadcast(&message.channel, &message.model);
            return;
        }
        let unrouted = self.unrouted.lock().unwrap_or_else(|e| e.into_inner());
        match unrouted.as_ref() {
            Some(tx) => {
                let _ = tx.send(message);
            }
            None => debug!(channel = %message.channel, "no subscriber, frame dropped"),
        }
    }
}

async fn accept_loop(
    listener: UnixListener,
    inbound: Inbound,
    peers: Peers,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let (reader, writer) = serve_peer(stream, inbound.clone(), peers.clone());
                let mut tasks = tasks.lock().unwrap_or_else(|e| e.into_inner());
                tasks.retain(|t| !t.is_finished());
                tasks.push(reader);
                tasks.push(writer);
            }
            Err(e) => warn!(error = %e, "error accepting connection"),
        }
    }
}

fn serve_peer(stream: UnixStream, inbound: Inbound, peers: Peers) -> (JoinHandle<()>, JoinHandle<()>) {
    let (mut reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<SyncMessage>();
    let id = peers.add(tx);
    debug!(peer = id, "peer connected");

    let writer_peers = peers.clone();
    let writer_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = protocol::write_frame(&mut writer, &message).await {
                warn!(peer = id, error = %e, "failed to send to peer, dropping it");
                writer_peers.remove(id);
                break;
            }
        }
    });

    let reader_task = tokio::spawn(async move {
        loop {
            match protocol::read_frame(&mut reader).await {
                Ok(message) => {
                    tracing::trace!(peer = id, channel = %message.channel, "frame received");
                    inbound.dispatch(message);
                }
                Err(ProtocolError::ConnectionClosed) => {
                    debug!(peer = id, "peer disconnected");
                    break;
                }
                Err(e) => {
                    warn!(peer = id, error = %e, "dropping peer after protocol error");
                    break;
                }
            }
        }
        peers.remove(id);
    });

    (reader_task, writer_task)
}
