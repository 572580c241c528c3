//! # CLI Module
//!
//! User-facing commands for the RSVP core. Each command builds the same
//! injectable [`TokenManager`]/[`PlaylistSynchronizer`] pair the HTTP server
//! uses, backed by the file store in the local data directory, so the CLI
//! and the server share credential state.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the HTTP API server (sync, search, OAuth callback)
//! - [`auth`] - Interactive Spotify authorization through the browser
//! - [`sync`] - Syncs the playlist from a confirmations JSON export
//! - [`search`] - Catalog track search printed as a table

use std::sync::Arc;

use crate::{
    config::SpotifyConfig,
    management::{FileStore, TokenManager},
    server::AppContext,
};

mod auth;
mod search;
mod serve;
mod sync;

pub use auth::auth;
pub use auth::wait_for_credential;
pub use search::search;
pub use serve::serve;
pub use sync::sync;

/// One context for the whole process, from environment configuration and the
/// durable file store.
fn build_context() -> Arc<AppContext> {
    let config = SpotifyConfig::from_env();
    let tokens = Arc::new(TokenManager::new(config, Arc::new(FileStore::new())));
    Arc::new(AppContext::new(tokens))
}
