use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error, info, success, types::Confirmation, warning};

/// Syncs the shared playlist from a confirmations JSON export.
///
/// The file holds the confirmation list as the backend returns it (the same
/// shape the `/sync` endpoint accepts). Shows a spinner while the paginated
/// read and batched additions run, then prints the outcome: a success count,
/// an authorization URL when interactive consent is needed, or the provider
/// failure for diagnosis.
pub async fn sync(file: PathBuf) {
    let content = match async_fs::read_to_string(&file).await {
        Ok(content) => content,
        Err(e) => error!("Failed to read {}: {}", file.display(), e),
    };
    let confirmations: Vec<Confirmation> = match serde_json::from_str(&content) {
        Ok(confirmations) => confirmations,
        Err(e) => error!("Failed to parse {}: {}", file.display(), e),
    };

    let ctx = super::build_context();

    let pb = ProgressBar::new_spinner();
    pb.set_message("Syncing playlist...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = ctx.synchronizer.sync(&confirmations).await;
    pb.finish_and_clear();

    match result {
        Ok(report) if report.success => {
            success!(
                "Playlist in sync, {} tracks added",
                report.added_tracks.unwrap_or(0)
            );
        }
        Ok(report) if report.needs_auth == Some(true) => {
            warning!("No Spotify user token available.");
            info!("Run guestlist auth to authorize, then sync again.");
        }
        Ok(report) => {
            warning!(
                "Sync did not complete: {}",
                report.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        Err(e) => error!("Failed to sync playlist: {}", e),
    }
}
