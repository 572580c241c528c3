use std::{sync::Arc, time::Duration};

use crate::{
    error, info,
    management::{SLOT_ACCESS_TOKEN, SLOT_AUTH_STATE, TokenStore},
    server::start_api_server,
    success, warning,
};

/// Runs the interactive Spotify authorization flow.
///
/// Starts the API server so the provider can reach the `/callback` redirect
/// target, opens the authorization URL in the default browser, and waits for
/// the callback to persist a user credential.
///
/// # Authentication Flow
///
/// 1. **Server start**: the HTTP server is spawned to receive the callback
/// 2. **Nonce setup**: a fresh state nonce is generated and persisted
/// 3. **Browser launch**: the authorization URL opens in the default browser
/// 4. **User consent**: the user grants the playlist scopes
/// 5. **Callback handling**: `/callback` validates the nonce and exchanges
///    the code
/// 6. **Token persistence**: the credential lands in the shared file store
///
/// Browser launch failures fall back to printing the URL for manual
/// navigation; a timeout or failed exchange terminates with an error.
pub async fn auth() {
    let ctx = super::build_context();

    let server_ctx = Arc::clone(&ctx);
    tokio::spawn(async move {
        start_api_server(server_ctx).await;
    });

    // Remember what was stored before the flow so a failed exchange that
    // leaves an older credential in place is not mistaken for a fresh one.
    let previous = ctx
        .tokens
        .store()
        .get(SLOT_ACCESS_TOKEN)
        .await
        .ok()
        .flatten();

    let auth_url = match ctx.tokens.build_authorization_url("/").await {
        Ok(url) => url,
        Err(e) => error!("Failed to build authorization URL: {}", e),
    };

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    info!("Waiting for authorization callback...");
    match wait_for_credential(ctx.tokens.store(), previous).await {
        Some(_) => success!("Authentication successful!"),
        None => error!("Authentication failed or timed out."),
    }
}

/// Polls the store until the callback consumed the state nonce, then reports
/// whether a new credential was persisted. A token equal to `previous` is a
/// leftover from before the flow, not a result of it: a failed exchange does
/// not clear older credentials, so only a changed value counts as success.
/// 120 second timeout, 1 second interval.
pub async fn wait_for_credential(
    store: &Arc<dyn TokenStore>,
    previous: Option<String>,
) -> Option<String> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let nonce_pending = matches!(store.get(SLOT_AUTH_STATE).await, Ok(Some(_)));
        if !nonce_pending {
            let token = store.get(SLOT_ACCESS_TOKEN).await.ok().flatten();
            return token.filter(|t| previous.as_ref() != Some(t));
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
