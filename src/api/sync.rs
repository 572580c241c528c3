use std::{collections::HashMap, sync::Arc};

use axum::{Extension, Json, extract::Query};

use crate::{
    management::{SLOT_SYNC_PENDING, TokenStore},
    server::AppContext,
    types::{Confirmation, SyncReport},
    warning,
};

/// Admin "sync playlist" action.
///
/// Takes the full confirmation list as the request body and returns a
/// [`SyncReport`]. When no user token is available the report carries
/// `needsAuth` plus the authorization URL to redirect to, and the
/// pending-sync flag is persisted so the callback can remind the operator to
/// re-trigger the sync. Errors surface in the report rather than as an HTTP
/// failure so the dashboard can show the provider's status and body.
pub async fn sync(
    Query(params): Query<HashMap<String, String>>,
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(confirmations): Json<Vec<Confirmation>>,
) -> Json<SyncReport> {
    match ctx.synchronizer.sync(&confirmations).await {
        Ok(mut report) => {
            if report.needs_auth == Some(true) {
                let return_to = params
                    .get("return_to")
                    .cloned()
                    .unwrap_or_else(|| "/".to_string());

                if let Err(e) = ctx.tokens.store().set(SLOT_SYNC_PENDING, "true").await {
                    warning!("Failed to persist pending-sync flag: {}", e);
                }
                match ctx.tokens.build_authorization_url(&return_to).await {
                    Ok(url) => report.auth_url = Some(url),
                    Err(e) => warning!("Failed to build authorization URL: {}", e),
                }
            }
            Json(report)
        }
        Err(e) => {
            warning!("Playlist sync failed: {}", e);
            Json(SyncReport::failed(e.to_string()))
        }
    }
}
