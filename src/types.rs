use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Safety margin applied when checking credential expiry. A token expiring
/// less than this far in the future is treated as already expired.
pub const EXPIRY_MARGIN_MS: i64 = 60_000;

/// App-level token obtained via the client-credentials grant. Used only for
/// read-only catalog search; re-requested on expiry, never refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCredential {
    pub access_token: String,
    pub expires_at: i64,
}

impl AppCredential {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at - EXPIRY_MARGIN_MS
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}

/// User-level token pair obtained via the authorization-code grant. Survives
/// process restarts through the token store and is refreshed in place when
/// expired, preserving the refresh token unless the provider rotates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl UserCredential {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at - EXPIRY_MARGIN_MS
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}

/// Response of the provider token endpoint for all three grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Expiry timestamp for caching, epoch milliseconds with a one minute
    /// margin subtracted up front.
    pub fn expires_at(&self, now_ms: i64) -> i64 {
        now_ms + (self.expires_in - 60) * 1000
    }
}

/// RSVP status of a guest's confirmation record. Only `Confirmed` records
/// contribute song suggestions to the playlist sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Cancelled,
    #[serde(other)]
    Other,
}

/// A guest's RSVP record. Owned by the external confirmation storage; this
/// crate only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub id: Option<String>,
    pub guest_name: String,
    #[serde(default)]
    pub contact: Option<String>,
    pub status: ConfirmationStatus,
    #[serde(default)]
    pub music_suggestions: Vec<SongSuggestion>,
}

/// A song suggested by a guest, produced by catalog search or carried from a
/// prior confirmation. Immutable once attached to a confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongSuggestion {
    pub spotify_id: String,
    pub song_title: String,
    pub artist: String,
    pub album_name: String,
    pub album_image_url: Option<String>,
    pub preview_url: Option<String>,
    pub duration_ms: u64,
    pub spotify_url: String,
}

/// Outcome of a playlist sync, serialized as the admin API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_tracks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncReport {
    pub fn added(count: usize) -> Self {
        SyncReport {
            success: true,
            added_tracks: Some(count),
            needs_auth: None,
            auth_url: None,
            error: None,
        }
    }

    pub fn needs_auth() -> Self {
        SyncReport {
            success: false,
            added_tracks: None,
            needs_auth: Some(true),
            auth_url: None,
            error: Some("user not authenticated".to_string()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        SyncReport {
            success: false,
            added_tracks: None,
            needs_auth: None,
            auth_url: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrack {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<SearchTracks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<SearchTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<SearchArtist>,
    pub album: Option<SearchAlbum>,
    pub preview_url: Option<String>,
    pub duration_ms: u64,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<SearchImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Tabled)]
pub struct SuggestionTableRow {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
}
