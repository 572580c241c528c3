use std::collections::HashSet;

use rand::{Rng, distr::Alphanumeric};

use crate::types::{Confirmation, ConfirmationStatus, SongSuggestion, SuggestionTableRow};

/// Random state nonce round-tripped through the authorization redirect to
/// prevent CSRF on the callback.
pub fn generate_state_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

/// Flattens confirmations into the suggestions that qualify for the playlist:
/// only confirmed guests count, and only suggestions carrying a track id.
pub fn candidate_suggestions(confirmations: &[Confirmation]) -> Vec<SongSuggestion> {
    confirmations
        .iter()
        .filter(|c| c.status == ConfirmationStatus::Confirmed)
        .flat_map(|c| c.music_suggestions.iter())
        .filter(|s| !s.spotify_id.is_empty())
        .cloned()
        .collect()
}

/// Track ids from `candidates` that are not yet in `existing`, deduplicated
/// while preserving first-seen order. A song suggested by two guests is
/// returned once.
pub fn missing_track_ids(candidates: &[SongSuggestion], existing: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(|s| s.spotify_id.clone())
        .filter(|id| !existing.contains(id))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn suggestion_table_rows(suggestions: &[SongSuggestion]) -> Vec<SuggestionTableRow> {
    suggestions
        .iter()
        .map(|s| SuggestionTableRow {
            title: s.song_title.clone(),
            artist: s.artist.clone(),
            album: s.album_name.clone(),
            duration: format_duration(s.duration_ms),
        })
        .collect()
}
