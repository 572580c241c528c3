use crate::{config, info, server::start_api_server};

/// Runs the HTTP API server until terminated.
pub async fn serve() {
    let ctx = super::build_context();
    info!("Serving on {}", config::server_addr());
    start_api_server(ctx).await;
}
