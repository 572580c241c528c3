use tabled::Table;

use crate::{error, info, spotify, utils};

/// Searches the Spotify catalog and prints the matching tracks as a table.
pub async fn search(query: String, limit: u32) {
    let ctx = super::build_context();

    let token = match ctx.tokens.get_app_token().await {
        Ok(token) => token,
        Err(e) => error!("Failed to obtain app token: {}", e),
    };

    let suggestions =
        match spotify::search::search_tracks(ctx.tokens.config(), &token, &query, limit).await {
            Ok(suggestions) => suggestions,
            Err(e) => error!("Failed to search tracks: {}", e),
        };

    if suggestions.is_empty() {
        info!("No tracks found for '{}'", query);
        return;
    }

    let rows = utils::suggestion_table_rows(&suggestions);
    println!("{}", Table::new(rows));
}
