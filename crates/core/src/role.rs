// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process role discriminator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a store's sync relationship this process is on.
///
/// Exactly one process per store is authoritative: it persists the model
/// and rebroadcasts merged state. Every other process is subordinate and
/// only ever forwards its local changes to the authoritative side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRole {
    Authoritative,
    Subordinate,
}

impl ProcessRole {
    pub fn is_authoritative(self) -> bool {
        matches!(self, ProcessRole::Authoritative)
    }

    /// Whether this role is allowed to write the persisted file
    pub fn may_persist(self) -> bool {
        self.is_authoritative()
    }
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessRole::Authoritative => write!(f, "authoritative"),
            ProcessRole::Subordinate => write!(f, "subordinate"),
        }
    }
}
