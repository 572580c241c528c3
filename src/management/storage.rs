use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{Result, SpotifyError};

// Named slots of the durable key/value storage. All values are strings; the
// expiry slot stores an integer epoch-millisecond string.
pub const SLOT_ACCESS_TOKEN: &str = "spotify_access_token";
pub const SLOT_REFRESH_TOKEN: &str = "spotify_refresh_token";
pub const SLOT_TOKEN_EXPIRES_AT: &str = "spotify_token_expires_at";
pub const SLOT_AUTH_STATE: &str = "spotify_auth_state";
pub const SLOT_SYNC_PENDING: &str = "spotify_sync_pending";
pub const SLOT_RETURN_TO: &str = "spotify_return_to";

/// Durable key/value storage for credential state.
///
/// The token manager only needs `get`/`set`/`remove` by named slot, so the
/// same lifecycle logic runs against a file in the local data directory, an
/// in-memory map in tests, or whatever a host application provides.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: one JSON object of slot/value pairs in the local data
/// directory. Reads the file on every access so concurrent processes see
/// each other's writes.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("guestlist/cache/spotify_store.json");
        FileStore { path }
    }

    pub fn with_path(path: PathBuf) -> Self {
        FileStore { path }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(SpotifyError::Storage(e.to_string())),
        };
        serde_json::from_str(&content).map_err(|e| SpotifyError::Storage(e.to_string()))
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| SpotifyError::Storage(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(map).map_err(|e| SpotifyError::Storage(e.to_string()))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| SpotifyError::Storage(e.to_string()))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

/// In-memory store. Used by tests and usable as an ephemeral store when
/// nothing should outlive the process.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}
