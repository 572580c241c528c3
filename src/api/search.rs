use std::sync::Arc;

use axum::{Extension, Json, extract::Query};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{server::AppContext, spotify, warning};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
    limit: Option<u32>,
}

/// Catalog track search for the RSVP form's song picker.
///
/// Runs on the app-level token so guests don't need any consent; returns the
/// matching tracks as `SongSuggestion` records ready to attach to a
/// confirmation.
pub async fn search(
    Query(params): Query<SearchParams>,
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Json<Value> {
    let token = match ctx.tokens.get_app_token().await {
        Ok(token) => token,
        Err(e) => {
            warning!("Failed to obtain app token: {}", e);
            return Json(json!({ "error": e.to_string() }));
        }
    };

    let limit = params.limit.unwrap_or(10);
    match spotify::search::search_tracks(ctx.tokens.config(), &token, &params.q, limit).await {
        Ok(suggestions) => Json(json!(suggestions)),
        Err(e) => {
            warning!("Track search failed: {}", e);
            Json(json!({ "error": e.to_string() }))
        }
    }
}
