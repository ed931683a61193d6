// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Disposers release exactly one registered subscription or reaction

use std::fmt;
use std::sync::Mutex;

type Release = Box<dyn FnOnce() + Send>;

/// Handle that releases one registration when disposed.
///
/// Disposing is idempotent: the release closure runs at most once, and
/// later calls are no-ops. Dropping a `Disposer` does not release it.
pub struct Disposer {
    release: Mutex<Option<Release>>,
}

impl Disposer {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// A disposer with nothing to release
    pub fn noop() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    pub fn dispose(&self) {
        let release = self
            .release
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(release) = release {
            release();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.release
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// An ordered collection of disposers released together
#[derive(Debug, Default)]
pub struct DisposerSet {
    items: Vec<Disposer>,
}

impl DisposerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, disposer: Disposer) {
        self.items.push(disposer);
    }

    /// Dispose every handle in registration order, then clear the set
    pub fn dispose_all(&mut self) {
        for disposer in self.items.drain(..) {
            disposer.dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "disposer_tests.rs"]
mod tests;
