//! Protected per-browser key-value store.
//!
//! ARCHITECTURE
//! ============
//! The provider only needs get/set/delete of opaque string values under a
//! fixed key. Protection of those values (encryption, integrity) belongs to
//! whatever backs the trait; the provider treats any read failure as "no
//! session". `MemorySessionStore` is the in-process backing used by the
//! host, one instance per browser session.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;

/// Key under which the serialized `UserSession` is stored.
pub const SESSION_KEY: &str = "UserSession";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error("session store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("session record does not serialize: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value collaborator scoped to one browser session.
///
/// `get` returns `Ok(None)` when the key is absent.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;
