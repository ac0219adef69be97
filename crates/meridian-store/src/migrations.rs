//! # Schema Migrations
//!
//! The device storage schema ships inside the binary as numbered SQL files
//! under `migrations/sqlite/`. New files get the next number; shipped files
//! are never edited because installed apps have already recorded their
//! checksums.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::StoreResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database is behind the embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations compiled into this build.
    pub embedded: usize,
    /// Rows recorded in `_sqlx_migrations`.
    pub applied: usize,
}

impl MigrationStatus {
    pub fn pending(&self) -> usize {
        self.embedded.saturating_sub(self.applied)
    }

    pub fn is_current(&self) -> bool {
        self.pending() == 0
    }
}

/// Brings the device storage schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying device storage schema");

    MIGRATOR.run(pool).await?;

    info!("Device storage schema is current");
    Ok(())
}

/// Reports embedded versus applied migrations.
///
/// A database that was never migrated has no bookkeeping table; that
/// surfaces as an error rather than a zero count.
pub async fn migration_status(pool: &SqlitePool) -> StoreResult<MigrationStatus> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: applied.max(0) as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_status_after_startup_is_current() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert!(status.embedded >= 1);
        assert_eq!(status.applied, status.embedded);
        assert!(status.is_current());
    }

    #[tokio::test]
    async fn test_status_errors_on_unmigrated_database() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        assert!(migration_status(db.pool()).await.is_err());

        db.run_migrations().await.unwrap();
        assert!(migration_status(db.pool()).await.unwrap().is_current());
    }

    #[test]
    fn test_pending_count() {
        let status = MigrationStatus { embedded: 3, applied: 1 };
        assert_eq!(status.pending(), 2);
        assert!(!status.is_current());
    }
}
