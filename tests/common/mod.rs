#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, atomic::AtomicBool, atomic::Ordering},
    time::Instant,
};

use axum::{
    Extension, Form, Router,
    extract::Query,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};

use guestlist::config::SpotifyConfig;

pub const PLAYLIST_ID: &str = "party";

/// In-process stand-in for the Spotify provider: token endpoint, paginated
/// playlist reads, and batched playlist writes, with enough bookkeeping to
/// assert on request counts and batch sizes.
#[derive(Default)]
pub struct MockProvider {
    base: OnceLock<String>,
    /// Track ids currently in the playlist.
    pub tracks: Mutex<Vec<String>>,
    /// Size of every successful add request, in order.
    pub add_batches: Mutex<Vec<usize>>,
    /// Arrival time of every successful add request, in order.
    pub add_times: Mutex<Vec<Instant>>,
    /// Grant type of every token-endpoint request, in order.
    pub grant_requests: Mutex<Vec<String>>,
    /// When set, refresh-token exchanges answer 400 invalid_grant.
    pub fail_refresh: AtomicBool,
    /// When `Some(n)`, add requests fail once `n` batches have succeeded.
    pub fail_write_after: Mutex<Option<usize>>,
}

impl MockProvider {
    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.add_batches.lock().unwrap().clone()
    }

    pub fn batch_times(&self) -> Vec<Instant> {
        self.add_times.lock().unwrap().clone()
    }

    pub fn grants(&self) -> Vec<String> {
        self.grant_requests.lock().unwrap().clone()
    }
}

async fn token_endpoint(
    Extension(provider): Extension<Arc<MockProvider>>,
    Form(params): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let grant_type = params.get("grant_type").cloned().unwrap_or_default();
    provider
        .grant_requests
        .lock()
        .unwrap()
        .push(grant_type.clone());
    let request_no = provider.grant_requests.lock().unwrap().len();

    match grant_type.as_str() {
        "client_credentials" => (
            StatusCode::OK,
            Json(json!({
                "access_token": format!("app-token-{request_no}"),
                "token_type": "Bearer",
                "expires_in": 3600
            })),
        ),
        "authorization_code" => {
            if params.get("code").map(String::as_str) == Some("valid-code") {
                (
                    StatusCode::OK,
                    Json(json!({
                        "access_token": "user-token",
                        "token_type": "Bearer",
                        "expires_in": 3600,
                        "refresh_token": "refresh-token",
                        "scope": "playlist-modify-private"
                    })),
                )
            } else if params.get("code").map(String::as_str) == Some("valid-code-no-refresh") {
                (
                    StatusCode::OK,
                    Json(json!({
                        "access_token": "user-token",
                        "token_type": "Bearer",
                        "expires_in": 3600,
                        "scope": "playlist-modify-private"
                    })),
                )
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_grant",
                        "error_description": "Invalid authorization code"
                    })),
                )
            }
        }
        "refresh_token" => {
            if provider.fail_refresh.load(Ordering::SeqCst) {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_grant",
                        "error_description": "Refresh token revoked"
                    })),
                )
            } else {
                (
                    StatusCode::OK,
                    Json(json!({
                        "access_token": "refreshed-token",
                        "token_type": "Bearer",
                        "expires_in": 3600
                    })),
                )
            }
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported_grant_type" })),
        ),
    }
}

async fn playlist_tracks(
    Extension(provider): Extension<Arc<MockProvider>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);
    let offset: usize = params
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let tracks = provider.tracks.lock().unwrap();
    let items: Vec<Value> = tracks
        .iter()
        .skip(offset)
        .take(limit)
        .map(|id| json!({ "track": { "id": id } }))
        .collect();

    let next = if offset + limit < tracks.len() {
        let base = provider.base.get().expect("base url set");
        Some(format!(
            "{base}/v1/playlists/{PLAYLIST_ID}/tracks?limit={limit}&offset={}",
            offset + limit
        ))
    } else {
        None
    };

    Json(json!({ "items": items, "next": next }))
}

async fn playlist_add(
    Extension(provider): Extension<Arc<MockProvider>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let done = provider.add_batches.lock().unwrap().len();
    if matches!(*provider.fail_write_after.lock().unwrap(), Some(n) if done >= n) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "status": 500, "message": "server error" } })),
        );
    }

    let uris: Vec<String> = body["uris"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|u| u.as_str())
                .map(|u| u.trim_start_matches("spotify:track:").to_string())
                .collect()
        })
        .unwrap_or_default();

    provider.add_batches.lock().unwrap().push(uris.len());
    provider.add_times.lock().unwrap().push(Instant::now());
    provider.tracks.lock().unwrap().extend(uris);

    (
        StatusCode::OK,
        Json(json!({ "snapshot_id": format!("snapshot-{}", done + 1) })),
    )
}

/// Binds the mock provider on an ephemeral port and returns a config whose
/// endpoint URLs point at it.
pub async fn spawn_provider() -> (SpotifyConfig, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::default());

    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .route(
            &format!("/v1/playlists/{PLAYLIST_ID}/tracks"),
            get(playlist_tracks).post(playlist_add),
        )
        .layer(Extension(Arc::clone(&provider)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    provider.base.set(base.clone()).unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = SpotifyConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: format!("{base}/callback"),
        auth_url: format!("{base}/authorize"),
        token_url: format!("{base}/api/token"),
        api_url: format!("{base}/v1"),
        playlist_id: PLAYLIST_ID.to_string(),
    };

    (config, provider)
}
