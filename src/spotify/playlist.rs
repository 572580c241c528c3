use std::collections::HashSet;

use crate::{
    config::SpotifyConfig,
    error::{Result, SpotifyError},
    spotify,
    types::{AddTracksRequest, AddTracksResponse, PlaylistTracksResponse},
};

/// Reads the full set of track ids currently in the target playlist.
///
/// Starts at a page size of 100 and follows the provider's `next` cursor
/// until exhausted, so the caller's diff sees the complete playlist, not just
/// the first page. The index is rebuilt fresh on every call; nothing is
/// cached across syncs.
///
/// An empty token short-circuits to an empty index. That should not occur
/// once the caller has obtained a token, but it mirrors the unauthenticated
/// no-op behavior of the rest of the sync path.
///
/// # Errors
///
/// Returns [`SpotifyError::PlaylistRead`] with the provider's status and
/// body for any non-success page response.
pub async fn get_track_index(config: &SpotifyConfig, token: &str) -> Result<HashSet<String>> {
    let mut index = HashSet::new();
    if token.is_empty() {
        return Ok(index);
    }

    let client = spotify::http_client();
    let mut next_url = Some(format!(
        "{uri}/playlists/{playlist}/tracks?limit=100",
        uri = config.api_url,
        playlist = config.playlist_id
    ));

    while let Some(url) = next_url {
        let res = client.get(&url).bearer_auth(token).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SpotifyError::PlaylistRead {
                status: status.as_u16(),
                body,
            });
        }

        let page = res.json::<PlaylistTracksResponse>().await?;
        for item in page.items {
            if let Some(id) = item.track.and_then(|t| t.id) {
                index.insert(id);
            }
        }
        next_url = page.next;
    }

    Ok(index)
}

/// Adds one batch of track URIs to the target playlist.
///
/// The provider caps additions at 50 URIs per request; the synchronizer is
/// responsible for chunking and for pacing successive batches.
///
/// # Errors
///
/// Returns [`SpotifyError::PlaylistWrite`] with the provider's status and
/// body for a non-success response.
pub async fn add_tracks(
    config: &SpotifyConfig,
    token: &str,
    uris: Vec<String>,
) -> Result<AddTracksResponse> {
    let res = spotify::http_client()
        .post(format!(
            "{uri}/playlists/{playlist}/tracks",
            uri = config.api_url,
            playlist = config.playlist_id
        ))
        .bearer_auth(token)
        .json(&AddTracksRequest { uris })
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SpotifyError::PlaylistWrite {
            status: status.as_u16(),
            body,
        });
    }

    Ok(res.json::<AddTracksResponse>().await?)
}
