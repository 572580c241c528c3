//! # Spotify Integration Module
//!
//! This module is the wire-level interface to the Spotify Web API. It handles
//! all HTTP communication with the provider: token-endpoint exchanges,
//! paginated playlist reads, batched playlist writes, and catalog search.
//! Higher-level lifecycle and orchestration (credential caching, diffing,
//! batching cadence) live in [`crate::management`].
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Raw token-endpoint exchanges for the three grant types:
//! - **Client credentials**: app-identity token for public catalog reads
//! - **Authorization code**: user-context token pair after interactive consent
//! - **Refresh token**: silent renewal of an expired user token
//!
//! All exchanges authenticate with a `Basic base64(client_id:client_secret)`
//! header and a form-encoded body, and surface non-success responses as
//! [`crate::error::SpotifyError::Auth`] carrying the provider's status and
//! body. No exchange is retried internally.
//!
//! ### Playlist Module
//!
//! [`playlist`] - Playlist reads and writes:
//! - **Track index**: reads every page of the playlist's tracks (page size
//!   100, following the provider's `next` cursor until exhausted)
//! - **Track additions**: posts track URIs, at most 50 per request
//!
//! ### Search Module
//!
//! [`search`] - App-token track search, mapped into the crate's
//! [`crate::types::SongSuggestion`] shape for the RSVP form.
//!
//! ## API Coverage
//!
//! - `POST {token_url}` - Token exchange and refresh operations
//! - `GET {api_url}/playlists/{id}/tracks` - Playlist track pages
//! - `POST {api_url}/playlists/{id}/tracks` - Track additions
//! - `GET {api_url}/search` - Catalog track search
//!
//! ## Configuration
//!
//! Every function takes a [`crate::config::SpotifyConfig`] rather than
//! reading the environment directly, so tests can point the base URLs at a
//! local mock server.

use std::time::Duration;

use reqwest::Client;

pub mod auth;
pub mod playlist;
pub mod search;

/// HTTP client used for all provider requests. Per-request timeout, no
/// automatic retries.
pub fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .unwrap_or_else(|_| Client::new())
}
