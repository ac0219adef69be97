//! # Device Storage
//!
//! The key/value collaborator the data layer reads identifiers and tokens
//! from. Mobile builds back it with the platform secure store; this crate
//! ships an in-memory backend (tests, ephemeral sessions) and a SQLite
//! backend ([`crate::SqliteStorage`]).
//!
//! ```text
//!   ContextResolver ──get(CMPUUID)──►┌──────────────────┐
//!   auth flows ──────set(ACCESS_TOKEN)►  DeviceStorage   │
//!   logout ──────────remove(...)────►└──────────────────┘
//!                                        │          │
//!                                 MemoryStorage  SqliteStorage
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use meridian_core::StorageKey;
use tokio::sync::RwLock;

use crate::error::StoreResult;

/// Async key/value storage keyed by [`StorageKey`].
///
/// Implementations own their consistency guarantees; callers never lock
/// around them.
#[async_trait]
pub trait DeviceStorage: Send + Sync {
    async fn get(&self, key: StorageKey) -> StoreResult<Option<String>>;

    async fn set(&self, key: StorageKey, value: &str) -> StoreResult<()>;

    async fn remove(&self, key: StorageKey) -> StoreResult<()>;

    /// Removes every known key.
    async fn clear(&self) -> StoreResult<()> {
        for key in StorageKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<T: DeviceStorage + ?Sized> DeviceStorage for Arc<T> {
    async fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: StorageKey) -> StoreResult<()> {
        (**self).remove(key).await
    }

    async fn clear(&self) -> StoreResult<()> {
        (**self).clear().await
    }
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// Process-local storage. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<StorageKey, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, e.g. with a logged-in session for tests.
    pub fn with_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (StorageKey, V)>,
        V: Into<String>,
    {
        let map = values.into_iter().map(|(k, v)| (k, v.into())).collect();
        MemoryStorage {
            values: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl DeviceStorage for MemoryStorage {
    async fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        self.values.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> StoreResult<()> {
        self.values.write().await.remove(&key);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.values.write().await.clear();
        Ok(())
    }
}
