mod auth;
mod storage;
mod sync;

pub use auth::TokenManager;
pub use storage::FileStore;
pub use storage::MemoryStore;
pub use storage::SLOT_ACCESS_TOKEN;
pub use storage::SLOT_AUTH_STATE;
pub use storage::SLOT_REFRESH_TOKEN;
pub use storage::SLOT_RETURN_TO;
pub use storage::SLOT_SYNC_PENDING;
pub use storage::SLOT_TOKEN_EXPIRES_AT;
pub use storage::TokenStore;
pub use sync::PlaylistSynchronizer;
pub use sync::TRACK_BATCH_SIZE;
