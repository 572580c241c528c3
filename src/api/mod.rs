//! # API Module
//!
//! HTTP endpoints for the admin server. It implements the OAuth redirect
//! target plus the administrative actions the dashboard calls into:
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`callback`] - OAuth redirect target. Receives `code` and `state` from
//!   the provider, completes the authorization, and reminds the operator of
//!   any sync left pending before the redirect.
//!
//! ### Playlist
//!
//! - [`sync`] - Accepts the full confirmation list as JSON and syncs the
//!   shared playlist with every confirmed song suggestion. When no user
//!   token is available the response carries `needsAuth` and the
//!   authorization URL instead of failing.
//!
//! ### Catalog
//!
//! - [`search`] - App-token track search backing the RSVP form's song
//!   picker.
//!
//! ### Monitoring
//!
//! - [`health`] - Health check returning application status and version.
//!
//! ## Architecture
//!
//! Built on [Axum](https://docs.rs/axum); handlers receive the shared
//! [`crate::server::AppContext`] through an `Extension` layer. Every failure
//! path produces a distinguishable JSON or HTML outcome; nothing fails
//! silently.

mod callback;
mod health;
mod search;
mod sync;

pub use callback::callback;
pub use health::health;
pub use search::search;
pub use sync::sync;
