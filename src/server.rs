use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{api, config, error, management::{PlaylistSynchronizer, TokenManager}};

/// Shared state for the HTTP handlers: one token manager and one
/// synchronizer for the whole process.
pub struct AppContext {
    pub tokens: Arc<TokenManager>,
    pub synchronizer: PlaylistSynchronizer,
}

impl AppContext {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        AppContext {
            synchronizer: PlaylistSynchronizer::new(Arc::clone(&tokens)),
            tokens,
        }
    }
}

pub async fn start_api_server(ctx: Arc<AppContext>) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/sync", post(api::sync))
        .route("/search", get(api::search))
        .layer(Extension(ctx));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
