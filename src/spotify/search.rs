use crate::{
    config::SpotifyConfig,
    error::{Result, SpotifyError},
    spotify,
    types::{SearchResponse, SongSuggestion},
};

/// Searches the catalog for tracks matching `query`.
///
/// Uses the app-level token, so no user consent is needed for the public
/// RSVP form. Results are mapped into [`SongSuggestion`] records, keeping
/// only the fields a confirmation carries.
///
/// # Errors
///
/// Returns [`SpotifyError::Auth`] with the provider's status and body for a
/// non-success response.
pub async fn search_tracks(
    config: &SpotifyConfig,
    token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<SongSuggestion>> {
    let limit = limit.to_string();
    let res = spotify::http_client()
        .get(format!("{uri}/search", uri = config.api_url))
        .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
        .bearer_auth(token)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SpotifyError::auth(status.as_u16(), body));
    }

    let response = res.json::<SearchResponse>().await?;
    let items = response.tracks.map(|t| t.items).unwrap_or_default();

    Ok(items
        .into_iter()
        .map(|track| {
            let album = track.album;
            SongSuggestion {
                spotify_id: track.id,
                song_title: track.name,
                artist: track
                    .artists
                    .iter()
                    .map(|a| a.name.clone())
                    .collect::<Vec<_>>()
                    .join(", "),
                album_name: album.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
                album_image_url: album
                    .as_ref()
                    .and_then(|a| a.images.first())
                    .map(|i| i.url.clone()),
                preview_url: track.preview_url,
                duration_ms: track.duration_ms,
                spotify_url: track.external_urls.spotify,
            }
        })
        .collect())
}
