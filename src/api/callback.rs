use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};

use crate::{
    management::{SLOT_RETURN_TO, SLOT_SYNC_PENDING, TokenStore},
    server::AppContext,
    warning,
};

/// OAuth redirect target.
///
/// The provider calls back here with `code` and `state` after the user
/// grants (or denies) consent. The state nonce is validated and consumed by
/// the token manager; on success the page links back to wherever the
/// operator came from and mentions a sync left pending before the redirect.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Html<String> {
    if let Some(denied) = params.get("error") {
        return Html(format!("<h4>Authorization denied: {}.</h4>", denied));
    }

    let (Some(code), Some(state)) = (params.get("code"), params.get("state")) else {
        return Html("<h4>Missing code or state parameter.</h4>".to_string());
    };

    match ctx.tokens.complete_authorization(code, state).await {
        Ok(_) => {
            let store = ctx.tokens.store();
            let return_to = store
                .get(SLOT_RETURN_TO)
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| "/".to_string());
            let _ = store.remove(SLOT_RETURN_TO).await;

            let pending = matches!(store.get(SLOT_SYNC_PENDING).await, Ok(Some(_)));
            let note = if pending {
                "<p>A playlist sync is pending; trigger it again to finish.</p>"
            } else {
                ""
            };

            Html(format!(
                "<h2>Authentication successful.</h2>{note}<p><a href=\"{return_to}\">Back to the dashboard</a></p>"
            ))
        }
        Err(e) => {
            warning!("Authorization callback failed: {}", e);
            Html(format!("<h4>Login failed: {}.</h4>", e))
        }
    }
}
