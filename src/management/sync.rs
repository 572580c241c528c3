use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::time::sleep;

use crate::{
    error::Result,
    info,
    management::{
        TokenManager,
        storage::{SLOT_SYNC_PENDING, TokenStore},
    },
    spotify,
    types::{Confirmation, SyncReport},
    utils,
};

/// Provider cap on track additions per request.
pub const TRACK_BATCH_SIZE: usize = 50;

/// Makes the shared playlist a superset of all confirmed song suggestions
/// without duplicating entries.
///
/// Each sync rebuilds the playlist's track index from a fresh paginated read
/// and submits only the diff, so re-running is idempotent without any local
/// memory of prior syncs. Batches already committed before a failure are not
/// rolled back; the next run's diff simply skips them.
pub struct PlaylistSynchronizer {
    tokens: Arc<TokenManager>,
    batch_delay: Duration,
    in_flight: AtomicBool,
}

impl PlaylistSynchronizer {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self::with_batch_delay(tokens, Duration::from_secs(1))
    }

    /// Same as [`new`](Self::new) with an explicit delay between successive
    /// track batches.
    pub fn with_batch_delay(tokens: Arc<TokenManager>, batch_delay: Duration) -> Self {
        PlaylistSynchronizer {
            tokens,
            batch_delay,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Syncs the playlist with the given confirmations.
    ///
    /// Returns `Ok` with a `needs_auth` report when no usable user token
    /// exists; the caller is responsible for redirecting to the
    /// authorization URL and re-triggering the sync after the callback.
    /// Playlist read/write failures propagate as errors.
    ///
    /// Overlapping invocations are rejected: interleaved diff/submit cycles
    /// could double-add tracks, so a second call while one is running gets a
    /// non-success report without touching the network.
    pub async fn sync(&self, confirmations: &[Confirmation]) -> Result<SyncReport> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Ok(SyncReport::failed("sync already in progress"));
        }

        let result = self.run(confirmations).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run(&self, confirmations: &[Confirmation]) -> Result<SyncReport> {
        let Some(token) = self.tokens.get_user_token().await? else {
            return Ok(SyncReport::needs_auth());
        };

        let candidates = utils::candidate_suggestions(confirmations);
        info!(
            "Found {} suggested tracks across {} confirmations",
            candidates.len(),
            confirmations.len()
        );

        let existing = spotify::playlist::get_track_index(self.tokens.config(), &token).await?;
        let to_add = utils::missing_track_ids(&candidates, &existing);
        info!(
            "Playlist has {} tracks, {} to add",
            existing.len(),
            to_add.len()
        );

        for (i, batch) in to_add.chunks(TRACK_BATCH_SIZE).enumerate() {
            if i > 0 {
                // Pause between successive batches to stay under rate limits.
                sleep(self.batch_delay).await;
            }
            let uris = batch.iter().map(|id| utils::track_uri(id)).collect();
            spotify::playlist::add_tracks(self.tokens.config(), &token, uris).await?;
        }

        self.tokens.store().remove(SLOT_SYNC_PENDING).await?;
        Ok(SyncReport::added(to_add.len()))
    }
}
