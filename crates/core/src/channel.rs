// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync channel naming and the wire message

use crate::role::ProcessRole;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Prefix for messages travelling authoritative -> subordinate
pub const TO_SUBORDINATE_PREFIX: &str = "store-sync-renderer:";
/// Prefix for messages travelling subordinate -> authoritative
pub const TO_AUTHORITATIVE_PREFIX: &str = "store-sync-main:";

/// Direction of travel for a sync message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncDirection {
    ToSubordinate,
    ToAuthoritative,
}

impl SyncDirection {
    /// Build the channel name for a store persisted at `path`
    pub fn channel_for(self, path: &Path) -> String {
        let prefix = match self {
            SyncDirection::ToSubordinate => TO_SUBORDINATE_PREFIX,
            SyncDirection::ToAuthoritative => TO_AUTHORITATIVE_PREFIX,
        };
        format!("{}{}", prefix, path.display())
    }

    /// Split a channel name into its direction and store path
    pub fn parse(channel: &str) -> Option<(Self, &Path)> {
        if let Some(path) = channel.strip_prefix(TO_SUBORDINATE_PREFIX) {
            return Some((SyncDirection::ToSubordinate, Path::new(path)));
        }
        channel
            .strip_prefix(TO_AUTHORITATIVE_PREFIX)
            .map(|path| (SyncDirection::ToAuthoritative, Path::new(path)))
    }

    /// Direction a process of the given role sends in
    pub fn outbound(role: ProcessRole) -> Self {
        match role {
            ProcessRole::Authoritative => SyncDirection::ToSubordinate,
            ProcessRole::Subordinate => SyncDirection::ToAuthoritative,
        }
    }

    /// Direction a process of the given role listens on
    pub fn inbound(role: ProcessRole) -> Self {
        match role {
            ProcessRole::Authoritative => SyncDirection::ToAuthoritative,
            ProcessRole::Subordinate => SyncDirection::ToSubordinate,
        }
    }
}

/// Both channel names for one store, computed once
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelNames {
    pub to_subordinate: String,
    pub to_authoritative: String,
}

impl ChannelNames {
    pub fn for_path(path: &Path) -> Self {
        Self {
            to_subordinate: SyncDirection::ToSubordinate.channel_for(path),
            to_authoritative: SyncDirection::ToAuthoritative.channel_for(path),
        }
    }

    pub fn get(&self, direction: SyncDirection) -> &str {
        match direction {
            SyncDirection::ToSubordinate => &self.to_subordinate,
            SyncDirection::ToAuthoritative => &self.to_authoritative,
        }
    }
}

/// A model snapshot sent over a named channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncMessage {
    pub channel: String,
    pub model: Value,
}

impl SyncMessage {
    pub fn new(channel: impl Into<String>, model: Value) -> Self {
        Self {
            channel: channel.into(),
            model,
        }
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
