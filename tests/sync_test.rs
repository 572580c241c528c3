use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;

use guestlist::config::SpotifyConfig;
use guestlist::management::{
    MemoryStore, PlaylistSynchronizer, SLOT_ACCESS_TOKEN, SLOT_REFRESH_TOKEN,
    SLOT_TOKEN_EXPIRES_AT, TokenManager, TokenStore,
};
use guestlist::types::{Confirmation, ConfirmationStatus, SongSuggestion};

mod common;

fn suggestion(id: &str) -> SongSuggestion {
    SongSuggestion {
        spotify_id: id.to_string(),
        song_title: format!("Song {}", id),
        artist: "Test Artist".to_string(),
        album_name: "Test Album".to_string(),
        album_image_url: None,
        preview_url: None,
        duration_ms: 180_000,
        spotify_url: format!("https://open.spotify.com/track/{}", id),
    }
}

fn confirmation(guest: &str, status: ConfirmationStatus, track_ids: &[&str]) -> Confirmation {
    Confirmation {
        id: None,
        guest_name: guest.to_string(),
        contact: None,
        status,
        music_suggestions: track_ids.iter().map(|id| suggestion(id)).collect(),
    }
}

async fn store_with_valid_token() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let expires_at = Utc::now().timestamp_millis() + 3_600_000;
    store.set(SLOT_ACCESS_TOKEN, "user-token").await.unwrap();
    store.set(SLOT_REFRESH_TOKEN, "refresh-token").await.unwrap();
    store
        .set(SLOT_TOKEN_EXPIRES_AT, &expires_at.to_string())
        .await
        .unwrap();
    store
}

fn synchronizer(config: SpotifyConfig, store: Arc<MemoryStore>) -> PlaylistSynchronizer {
    let tokens = Arc::new(TokenManager::new(config, store));
    PlaylistSynchronizer::with_batch_delay(tokens, Duration::ZERO)
}

#[tokio::test]
async fn sync_without_token_reports_needs_auth() {
    let (config, provider) = common::spawn_provider().await;
    let sync = synchronizer(config, Arc::new(MemoryStore::new()));

    let report = sync
        .sync(&[confirmation("Ana", ConfirmationStatus::Confirmed, &["t1"])])
        .await
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.needs_auth, Some(true));
    // No token to refresh and nothing to add: the provider is never touched.
    assert!(provider.grants().is_empty());
    assert!(provider.batch_sizes().is_empty());
}

#[tokio::test]
async fn only_confirmed_suggestions_are_added() {
    let (config, provider) = common::spawn_provider().await;
    let sync = synchronizer(config, store_with_valid_token().await);

    let confirmations = vec![
        confirmation("Ana", ConfirmationStatus::Confirmed, &["t1", "t2"]),
        confirmation("Bruno", ConfirmationStatus::Pending, &["t3"]),
        confirmation("Carla", ConfirmationStatus::Cancelled, &["t4"]),
    ];

    let report = sync.sync(&confirmations).await.unwrap();

    assert!(report.success);
    assert_eq!(report.added_tracks, Some(2));
    assert_eq!(provider.track_ids(), vec!["t1", "t2"]);
}

#[tokio::test]
async fn suggestions_without_track_id_are_skipped() {
    let (config, provider) = common::spawn_provider().await;
    let sync = synchronizer(config, store_with_valid_token().await);

    let mut conf = confirmation("Ana", ConfirmationStatus::Confirmed, &["t1"]);
    conf.music_suggestions.push(suggestion(""));

    let report = sync.sync(&[conf]).await.unwrap();

    assert_eq!(report.added_tracks, Some(1));
    assert_eq!(provider.track_ids(), vec!["t1"]);
}

#[tokio::test]
async fn second_sync_adds_nothing() {
    let (config, provider) = common::spawn_provider().await;
    let sync = synchronizer(config, store_with_valid_token().await);

    let confirmations = vec![confirmation(
        "Ana",
        ConfirmationStatus::Confirmed,
        &["t1", "t2", "t3"],
    )];

    let first = sync.sync(&confirmations).await.unwrap();
    assert_eq!(first.added_tracks, Some(3));

    let second = sync.sync(&confirmations).await.unwrap();
    assert!(second.success);
    assert_eq!(second.added_tracks, Some(0));

    // One write overall; the second run's fresh read found nothing missing.
    assert_eq!(provider.batch_sizes(), vec![3]);
}

#[tokio::test]
async fn same_track_from_two_guests_is_added_once() {
    let (config, provider) = common::spawn_provider().await;
    let sync = synchronizer(config, store_with_valid_token().await);

    let confirmations = vec![
        confirmation("Ana", ConfirmationStatus::Confirmed, &["t1"]),
        confirmation("Bruno", ConfirmationStatus::Confirmed, &["t1"]),
    ];

    let report = sync.sync(&confirmations).await.unwrap();

    assert_eq!(report.added_tracks, Some(1));
    assert_eq!(provider.track_ids(), vec!["t1"]);
}

#[tokio::test]
async fn diff_sees_every_playlist_page() {
    let (config, provider) = common::spawn_provider().await;

    // 250 existing tracks: three pages at the provider's page size of 100.
    {
        let mut tracks = provider.tracks.lock().unwrap();
        *tracks = (0..250).map(|i| format!("t{}", i)).collect();
    }

    let sync = synchronizer(config, store_with_valid_token().await);

    // t42 is on page one, t199 on page two, t249 on page three.
    let confirmations = vec![confirmation(
        "Ana",
        ConfirmationStatus::Confirmed,
        &["t42", "t199", "t249", "new1"],
    )];

    let report = sync.sync(&confirmations).await.unwrap();

    assert_eq!(report.added_tracks, Some(1));
    assert_eq!(provider.batch_sizes(), vec![1]);
    assert!(provider.track_ids().contains(&"new1".to_string()));
}

#[tokio::test]
async fn additions_are_submitted_in_batches_of_fifty() {
    let (config, provider) = common::spawn_provider().await;
    let sync = synchronizer(config, store_with_valid_token().await);

    let ids: Vec<String> = (0..120).map(|i| format!("n{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let confirmations = vec![confirmation("Ana", ConfirmationStatus::Confirmed, &id_refs)];

    let report = sync.sync(&confirmations).await.unwrap();

    assert_eq!(report.added_tracks, Some(120));
    assert_eq!(provider.batch_sizes(), vec![50, 50, 20]);
}

#[tokio::test]
async fn batch_delay_sits_between_batches_not_after_the_last() {
    let (config, provider) = common::spawn_provider().await;
    let delay = Duration::from_millis(250);
    let tokens = Arc::new(TokenManager::new(config, store_with_valid_token().await));
    let sync = PlaylistSynchronizer::with_batch_delay(tokens, delay);

    let ids: Vec<String> = (0..120).map(|i| format!("n{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let confirmations = vec![confirmation("Ana", ConfirmationStatus::Confirmed, &id_refs)];

    let report = sync.sync(&confirmations).await.unwrap();
    let finished = Instant::now();

    assert_eq!(report.added_tracks, Some(120));

    let times = provider.batch_times();
    assert_eq!(times.len(), 3);
    assert!(times[1] - times[0] >= delay);
    assert!(times[2] - times[1] >= delay);

    // No trailing pause: the sync returns well before another delay would
    // have elapsed after the final batch.
    assert!(finished - times[2] < delay);
}

#[tokio::test]
async fn failed_batch_aborts_without_rollback() {
    let (config, provider) = common::spawn_provider().await;
    let sync = synchronizer(config, store_with_valid_token().await);

    // Second batch fails.
    *provider.fail_write_after.lock().unwrap() = Some(1);

    let ids: Vec<String> = (0..70).map(|i| format!("n{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let confirmations = vec![confirmation("Ana", ConfirmationStatus::Confirmed, &id_refs)];

    let result = sync.sync(&confirmations).await;
    assert!(result.is_err());

    // The first batch stays committed.
    assert_eq!(provider.batch_sizes(), vec![50]);
    assert_eq!(provider.track_ids().len(), 50);

    // Re-running after the failure picks up only the remainder.
    *provider.fail_write_after.lock().unwrap() = None;
    let report = sync.sync(&confirmations).await.unwrap();
    assert_eq!(report.added_tracks, Some(20));
    assert_eq!(provider.track_ids().len(), 70);
}
