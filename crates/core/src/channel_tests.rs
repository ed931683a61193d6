// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;
use yare::parameterized;

#[test]
fn channel_names_follow_naming_contract() {
    let names = ChannelNames::for_path(Path::new("/data/prefs.json"));
    assert_eq!(names.to_subordinate, "store-sync-renderer:/data/prefs.json");
    assert_eq!(names.to_authoritative, "store-sync-main:/data/prefs.json");
}

#[test]
fn distinct_paths_never_collide() {
    let a = ChannelNames::for_path(Path::new("/data/a.json"));
    let b = ChannelNames::for_path(Path::new("/data/b.json"));
    assert_ne!(a.to_subordinate, b.to_subordinate);
    assert_ne!(a.to_authoritative, b.to_authoritative);
    assert_ne!(a.to_subordinate, a.to_authoritative);
}

#[parameterized(
    authoritative = { ProcessRole::Authoritative, SyncDirection::ToSubordinate, SyncDirection::ToAuthoritative },
    subordinate = { ProcessRole::Subordinate, SyncDirection::ToAuthoritative, SyncDirection::ToSubordinate },
)]
fn directions_by_role(role: ProcessRole, outbound: SyncDirection, inbound: SyncDirection) {
    assert_eq!(SyncDirection::outbound(role), outbound);
    assert_eq!(SyncDirection::inbound(role), inbound);
}

#[test]
fn get_returns_name_for_direction() {
    let path = PathBuf::from("/x/y.json");
    let names = ChannelNames::for_path(&path);
    assert_eq!(
        names.get(SyncDirection::ToAuthoritative),
        SyncDirection::ToAuthoritative.channel_for(&path)
    );
}

#[test]
fn sync_message_serializes_channel_and_model() {
    let msg = SyncMessage::new("store-sync-main:/p.json", serde_json::json!({ "x": 1 }));
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["channel"], "store-sync-main:/p.json");
    assert_eq!(json["model"]["x"], 1);
}

#[parameterized(
    to_subordinate = { "store-sync-renderer:/data/a.json", Some((SyncDirection::ToSubordinate, "/data/a.json")) },
    to_authoritative = { "store-sync-main:/data/a.json", Some((SyncDirection::ToAuthoritative, "/data/a.json")) },
    unknown_prefix = { "other:/data/a.json", None },
    bare_path = { "/data/a.json", None },
)]
fn parse_splits_direction_and_path(channel: &str, expected: Option<(SyncDirection, &str)>) {
    let parsed = SyncDirection::parse(channel);
    assert_eq!(parsed, expected.map(|(direction, path)| (direction, Path::new(path))));
}
