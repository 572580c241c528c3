use thiserror::Error;

/// Error taxonomy for token and playlist operations.
///
/// "Needs interactive authentication" is deliberately not a variant: the
/// token manager returns `Ok(None)` for that case and the synchronizer turns
/// it into a `needs_auth` report, so callers can distinguish "redirect the
/// user" from an actual failure.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Token exchange failed, state nonce mismatched, or the authorization
    /// code was invalid. Carries the provider's status and body where known.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Non-success response while reading playlist pages.
    #[error("playlist read failed with status {status}: {body}")]
    PlaylistRead { status: u16, body: String },

    /// Non-success response while adding tracks to the playlist.
    #[error("playlist write failed with status {status}: {body}")]
    PlaylistWrite { status: u16, body: String },

    /// Durable token storage could not be read or written.
    #[error("token storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl SpotifyError {
    pub fn auth(status: u16, body: impl AsRef<str>) -> Self {
        SpotifyError::Auth(format!("status {}: {}", status, body.as_ref()))
    }
}

pub type Result<T> = std::result::Result<T, SpotifyError>;
