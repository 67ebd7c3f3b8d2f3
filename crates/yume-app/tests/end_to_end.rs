//! End-to-end tests: browser post → game state → presence payload → client.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use yume_core::SessionClock;
use yume_ingest::{create_router, GameStateStore};
use yume_prefs::{keys, PreferenceStore, PRESENCE_FILE};
use yume_presence::{
    ClientCall, LoopConfig, LoopOutcome, MockPresenceClient, PresenceUpdateLoop, RetryPolicy,
};

const ROOM_POST: &str = r#"{"data": {
    "type": "2KKI_DATA",
    "gameType": "2kki",
    "location": "Urotsuki's Room",
    "badgeImageUrl": "http://x/badge.png",
    "playersOnline": 5,
    "playersOnMap": 2,
    "wikiPageUrl": "http://wiki/room"
}}"#;

fn fast_loop() -> LoopConfig {
    LoopConfig {
        interval: Duration::from_millis(10),
        retry: RetryPolicy::bounded(3, Duration::from_millis(10)),
        reset_session_on_hub: true,
    }
}

#[tokio::test]
async fn test_posted_real_world_room_translates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(PRESENCE_FILE),
        "real_world_text = \"Real World\"\nstate = \"In: {location}\"\n",
    )
    .unwrap();
    let prefs = PreferenceStore::new(dir.path());
    let store = GameStateStore::new();

    let response = create_router(store.clone())
        .oneshot(common::extension_post(ROOM_POST))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = store.read();
    let payload = common::translator(None)
        .translate(snapshot.as_deref(), &prefs.snapshot(), 1_700_000_000)
        .await;

    assert_eq!(payload.details, "Real World");
    assert_eq!(payload.state, "In: Urotsuki's Room");
    assert_eq!(payload.small_image, "http://x/badge.png");
    assert_eq!(payload.session_start, 1_700_000_000);
}

#[tokio::test]
async fn test_loop_pushes_what_the_browser_posted() {
    let dir = tempfile::tempdir().unwrap();
    let store = GameStateStore::new();
    let router = create_router(store.clone());
    let mock = MockPresenceClient::new();
    let shutdown = CancellationToken::new();

    let update_loop = PresenceUpdateLoop::new(
        Box::new(mock.clone()),
        common::translator(Some("http://img/room.png")),
        store.clone(),
        Arc::new(PreferenceStore::new(dir.path())),
        fast_loop(),
        shutdown.clone(),
    )
    .with_session(SessionClock::starting_at(10));
    let task = tokio::spawn(update_loop.run());

    tokio::time::sleep(Duration::from_millis(40)).await;
    router
        .clone()
        .oneshot(common::extension_post(ROOM_POST))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    // A malformed post leaves the presence untouched.
    let rejected = router
        .oneshot(common::extension_post("{\"data\": "))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    tokio::time::sleep(Duration::from_millis(40)).await;

    shutdown.cancel();
    assert_eq!(task.await.unwrap(), LoopOutcome::Completed);

    let updates = mock.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].state, "Getting ready...");
    assert_eq!(updates[1].details, "Real World");
    assert_eq!(updates[1].state, "In: Urotsuki's Room");
    assert_eq!(updates[1].large_image, "http://img/room.png");
    assert_eq!(updates[1].small_image, "http://x/badge.png");
    assert_eq!(updates[1].session_start, 10);
    assert!(mock.calls().ends_with(&[ClientCall::Clear, ClientCall::Close]));
}

#[tokio::test]
async fn test_saved_preferences_apply_on_next_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = Arc::new(PreferenceStore::new(dir.path()));
    let store = GameStateStore::new();
    let mock = MockPresenceClient::new();
    let shutdown = CancellationToken::new();

    create_router(store.clone())
        .oneshot(common::extension_post(
            r#"{"gameType": "yume", "location": "Nexus", "playersOnline": 1}"#,
        ))
        .await
        .unwrap();

    let update_loop = PresenceUpdateLoop::new(
        Box::new(mock.clone()),
        common::translator(None),
        store,
        prefs.clone(),
        fast_loop(),
        shutdown.clone(),
    );
    let task = tokio::spawn(update_loop.run());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let mut values = BTreeMap::new();
    values.insert(keys::DETAILS.to_string(), "Dreaming in {gametype}".to_string());
    prefs.save_presence(&values).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    shutdown.cancel();
    task.await.unwrap();

    let updates = mock.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].details, "Playing Yume Nikki");
    assert_eq!(updates[1].details, "Dreaming in Yume Nikki");
    assert_eq!(updates[1].state, "In: Nexus");
}

#[tokio::test]
async fn test_connect_failures_then_cancel_push_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = GameStateStore::new();
    let mock = MockPresenceClient::new();
    mock.fail_connects(u32::MAX);
    let shutdown = CancellationToken::new();

    create_router(store.clone())
        .oneshot(common::extension_post(ROOM_POST))
        .await
        .unwrap();

    let update_loop = PresenceUpdateLoop::new(
        Box::new(mock.clone()),
        common::translator(None),
        store,
        Arc::new(PreferenceStore::new(dir.path())),
        LoopConfig {
            retry: RetryPolicy::indefinite(Duration::from_millis(10)),
            ..fast_loop()
        },
        shutdown.clone(),
    );
    let task = tokio::spawn(update_loop.run());

    tokio::time::sleep(Duration::from_millis(35)).await;
    shutdown.cancel();

    assert_eq!(task.await.unwrap(), LoopOutcome::Completed);
    assert!(mock.updates().is_empty());
    assert_eq!(mock.count(&ClientCall::Clear), 0);
    assert_eq!(mock.calls().last(), Some(&ClientCall::Close));
}
