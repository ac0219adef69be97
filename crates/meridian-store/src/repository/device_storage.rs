//! # SQLite Device Storage
//!
//! [`DeviceStorage`] over the `device_storage` table.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┬──────────────────────────┐
//! │ key (PK)         │ value                    │ updated_at               │
//! ├──────────────────┼──────────────────────────┼──────────────────────────┤
//! │ UUID             │ 6f1c...                  │ 2025-06-01T09:12:44Z     │
//! │ ACCESS_TOKEN     │ eyJhbGciOi...            │ 2025-06-01T09:12:44Z     │
//! │ ROLES            │ ["Admin"]                │ 2025-06-01T09:12:44Z     │
//! └──────────────────┴──────────────────────────┴──────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use meridian_core::StorageKey;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use crate::storage::DeviceStorage;

#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStorage { pool }
    }

    /// Keys currently stored, for diagnostics. Unknown names are skipped.
    pub async fn stored_keys(&self) -> StoreResult<Vec<StorageKey>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT key FROM device_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(names.iter().filter_map(|n| n.parse().ok()).collect())
    }
}

#[async_trait]
impl DeviceStorage for SqliteStorage {
    async fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM device_storage WHERE key = ?1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    async fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        debug!(key = %key, "Writing device storage");

        sqlx::query(
            r#"
            INSERT INTO device_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> StoreResult<()> {
        sqlx::query("DELETE FROM device_storage WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM device_storage")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
