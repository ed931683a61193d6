// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tandem_storage::FakePersistence;

fn saver(persistence: &FakePersistence) -> Saver {
    Saver::new(
        "prefs",
        PathBuf::from("/data/tandem/prefs.json"),
        Arc::new(persistence.clone()),
    )
}

#[tokio::test]
async fn saves_land_in_order() {
    let persistence = FakePersistence::new();
    let saver = saver(&persistence);

    for x in 1..=3 {
        saver.save(json!({ "x": x }));
    }
    saver.idle().await;

    assert_eq!(
        persistence.writes(),
        vec![json!({ "x": 1 }), json!({ "x": 2 }), json!({ "x": 3 })]
    );
}

#[tokio::test]
async fn idle_without_saves_resolves() {
    let persistence = FakePersistence::new();
    saver(&persistence).idle().await;
    assert!(persistence.writes().is_empty());
}

#[test]
fn saves_inline_without_runtime() {
    let persistence = FakePersistence::new();
    saver(&persistence).save(json!({ "x": 1 }));
    assert_eq!(persistence.writes(), vec![json!({ "x": 1 })]);
}

#[test]
fn saves_inline_after_its_runtime_is_gone() {
    let persistence = FakePersistence::new();
    let saver = saver(&persistence);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        saver.save(json!({ "x": 1 }));
        saver.idle().await;
    });
    drop(runtime);

    saver.save(json!({ "x": 2 }));

    assert_eq!(persistence.writes(), vec![json!({ "x": 1 }), json!({ "x": 2 })]);
}

#[tokio::test]
async fn failed_save_does_not_stop_the_queue() {
    let persistence = FakePersistence::new();
    let saver = saver(&persistence);
    persistence.fail_writes(true);
    saver.save(json!({ "x": 1 }));
    saver.idle().await;

    persistence.fail_writes(false);
    saver.save(json!({ "x": 2 }));
    saver.idle().await;

    assert_eq!(persistence.writes().len(), 2);
    assert_eq!(
        persistence.document(Path::new("/data/tandem/prefs.json")),
        Some(json!({ "x": 2 }))
    );
}
