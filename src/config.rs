//! Configuration management for the RSVP core.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials, the
//! target playlist, and server settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory

use dotenv;
use std::{env, path::PathBuf};

/// OAuth scopes requested during user authorization. Fixed: the playlist sync
/// needs read access to the collaborative playlist and write access for the
/// suggested tracks.
pub const PLAYLIST_SCOPES: &str =
    "playlist-modify-public playlist-modify-private playlist-read-private playlist-read-collaborative";

/// Endpoint and credential configuration for the Spotify provider.
///
/// Built from the environment once at startup and injected into the token
/// manager, so tests can point the base URLs at a local mock server instead.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub playlist_id: String,
}

impl SpotifyConfig {
    /// Builds the configuration from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if any of the required `SPOTIFY_*` environment variables is
    /// not set. Call [`load_env`] first.
    pub fn from_env() -> Self {
        SpotifyConfig {
            client_id: spotify_client_id(),
            client_secret: spotify_client_secret(),
            redirect_uri: spotify_redirect_uri(),
            auth_url: spotify_apiauth_url(),
            token_url: spotify_apitoken_url(),
            api_url: spotify_apiurl(),
            playlist_id: spotify_playlist_id(),
        }
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `guestlist/.env`. This allows operators to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/guestlist/.env`
/// - macOS: `~/Library/Application Support/guestlist/.env`
/// - Windows: `%LOCALAPPDATA%/guestlist/.env`
///
/// # Returns
///
/// Returns `Ok(())` if the environment file is successfully loaded, or an
/// error string if directory creation or file loading fails.
///
/// # Example
///
/// ```
/// use guestlist::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("guestlist/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Returns the server address for the HTTP API server.
///
/// Retrieves the `SERVER_ADDRESS` environment variable which specifies the
/// address and port where the server should bind, e.g. `127.0.0.1:8080`.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify API client ID for authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret for authentication.
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable is not
/// set.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_SECRET").expect("SPOTIFY_API_AUTH_CLIENT_SECRET must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings; the provider redirects here with `code` and `state` after the
/// user grants consent.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the id of the shared playlist that confirmed suggestions are
/// synced into.
///
/// # Panics
///
/// Panics if the `SPOTIFY_PLAYLIST_ID` environment variable is not set.
pub fn spotify_playlist_id() -> String {
    env::var("SPOTIFY_PLAYLIST_ID").expect("SPOTIFY_PLAYLIST_ID must be set")
}
