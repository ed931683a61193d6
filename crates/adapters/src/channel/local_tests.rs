// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::sync::Mutex;

fn collector() -> (Arc<Mutex<Vec<Value>>>, MessageHandler) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let handler: MessageHandler = Arc::new(move |model| sink.lock().unwrap().push(model.clone()));
    (received, handler)
}

#[test]
fn broadcast_reaches_channel_subscribers() {
    let bus = LocalBus::new();
    let (received, handler) = collector();
    let _sub = bus.subscribe("store-sync-main:/a.json", handler);

    bus.broadcast("store-sync-main:/a.json", &json!({ "x": 1 }));

    assert_eq!(*received.lock().unwrap(), vec![json!({ "x": 1 })]);
}

#[test]
fn other_channels_not_delivered() {
    let bus = LocalBus::new();
    let (received, handler) = collector();
    let _sub = bus.subscribe("store-sync-main:/a.json", handler);

    bus.broadcast("store-sync-main:/b.json", &json!(1));
    bus.broadcast("store-sync-renderer:/a.json", &json!(2));

    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn multiple_subscribers_each_receive() {
    let bus = LocalBus::new();
    let (a, ha) = collector();
    let (b, hb) = collector();
    let _da = bus.subscribe("c", ha);
    let _db = bus.subscribe("c", hb);

    bus.broadcast("c", &json!("m"));

    assert_eq!(a.lock().unwrap().len(), 1);
    assert_eq!(b.lock().unwrap().len(), 1);
    assert_eq!(bus.subscriber_count("c"), 2);
}

#[test]
fn dispose_removes_only_that_subscriber() {
    let bus = LocalBus::new();
    let (a, ha) = collector();
    let (b, hb) = collector();
    let da = bus.subscribe("c", ha);
    let _db = bus.subscribe("c", hb);

    da.dispose();
    bus.broadcast("c", &json!(1));

    assert!(a.lock().unwrap().is_empty());
    assert_eq!(b.lock().unwrap().len(), 1);
    assert_eq!(bus.subscriber_count("c"), 1);
}

#[test]
fn dispose_is_idempotent_and_cleans_channel() {
    let bus = LocalBus::new();
    let (_, handler) = collector();
    let disposer = bus.subscribe("c", handler);

    disposer.dispose();
    disposer.dispose();

    assert_eq!(bus.subscriber_count("c"), 0);
    assert!(bus.channels().is_empty());
}

#[test]
fn handler_disposed_mid_broadcast_is_skipped() {
    let bus = LocalBus::new();
    let (second, h2) = collector();
    let second_disposer = Arc::new(Mutex::new(None::<Disposer>));

    // First handler disposes the second one while the broadcast is running
    let slot = Arc::clone(&second_disposer);
    let h1: MessageHandler = Arc::new(move |_| {
        if let Some(d) = slot.lock().unwrap().as_ref() {
            d.dispose();
        }
    });
    let _d1 = bus.subscribe("c", h1);
    *second_disposer.lock().unwrap() = Some(bus.subscribe("c", h2));

    bus.broadcast("c", &json!(1));

    assert!(second.lock().unwrap().is_empty());
}

#[test]
fn handler_may_resubscribe_during_delivery() {
    let bus = LocalBus::new();
    let inner_bus = bus.clone();
    let (received, inner_handler) = collector();
    let h: MessageHandler = Arc::new(move |_| {
        let _ = inner_bus.subscribe("other", Arc::clone(&inner_handler));
    });
    let _d = bus.subscribe("c", h);

    bus.broadcast("c", &json!(1));
    bus.broadcast("other", &json!(2));

    assert_eq!(*received.lock().unwrap(), vec![json!(2)]);
}

#[test]
fn clone_shares_state() {
    let bus1 = LocalBus::new();
    let bus2 = bus1.clone();
    let (received, handler) = collector();
    let _d = bus1.subscribe("c", handler);

    bus2.broadcast("c", &json!(1));

    assert_eq!(received.lock().unwrap().len(), 1);
    assert_eq!(bus2.subscriber_count("c"), 1);
}
