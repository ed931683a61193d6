// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered background saves for one store
//!
//! Saves are queued to a single worker task that runs each write on the
//! blocking pool, one at a time, so documents land in the order the changes
//! were made and the mutation path never waits on the disk.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tandem_storage::PersistenceAdapter;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

enum Job {
    Write(Value),
    Idle(oneshot::Sender<()>),
}

#[derive(Clone)]
pub(crate) struct Saver {
    name: Arc<str>,
    path: PathBuf,
    persistence: Arc<dyn PersistenceAdapter>,
    queue: Arc<Mutex<Option<mpsc::UnboundedSender<Job>>>>,
}

impl Saver {
    pub(crate) fn new(name: &str, path: PathBuf, persistence: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            name: Arc::from(name),
            path,
            persistence,
            queue: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue `model` to be written. Without a runtime the write happens
    /// inline.
    pub(crate) fn save(&self, model: Value) {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.is_none() {
            let Ok(handle) = Handle::try_current() else {
                drop(queue);
                write(&self.name, &self.path, self.persistence.as_ref(), &model);
                return;
            };
            let (tx, rx) = mpsc::unbounded_channel();
            handle.spawn(run(
                Arc::clone(&self.name),
                self.path.clone(),
                Arc::clone(&self.persistence),
                rx,
            ));
            *queue = Some(tx);
        }
        let Some(tx) = queue.as_ref() else {
            return;
        };
        // The worker is gone once the runtime that spawned it shuts down
        if let Err(mpsc::error::SendError(Job::Write(model))) = tx.send(Job::Write(model)) {
            *queue = None;
            drop(queue);
            write(&self.name, &self.path, self.persistence.as_ref(), &model);
        }
    }

    /// Resolve once every save queued so far has finished
    pub(crate) async fn idle(&self) {
        let (done, wait) = oneshot::channel();
        {
            let queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
            let Some(tx) = queue.as_ref() else {
                return;
            };
            if tx.send(Job::Idle(done)).is_err() {
                return;
            }
        }
        let _ = wait.await;
    }
}

/// Runs until the store, and with it the queue's sender, is dropped
async fn run(
    name: Arc<str>,
    path: PathBuf,
    persistence: Arc<dyn PersistenceAdapter>,
    mut jobs: mpsc::UnboundedReceiver<Job>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            Job::Write(model) => {
                let task = {
                    let name = Arc::clone(&name);
                    let path = path.clone();
                    let persistence = Arc::clone(&persistence);
                    tokio::task::spawn_blocking(move || {
                        write(&name, &path, persistence.as_ref(), &model)
                    })
                };
                if let Err(e) = task.await {
                    error!(store = %name, error = %e, "save task failed");
                }
            }
            Job::Idle(done) => {
                let _ = done.send(());
            }
        }
    }
}

fn write(name: &str, path: &Path, persistence: &dyn PersistenceAdapter, model: &Value) {
    info!(store = %name, path = %path.display(), "saving store");
    if let Err(e) = persistence.write(path, model) {
        error!(store = %name, error = %e, "failed to save store");
    }
}

#[cfg(test)]
#[path = "saver_tests.rs"]
mod tests;
