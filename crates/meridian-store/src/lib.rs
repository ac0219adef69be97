//! # meridian-store: Device Storage for Meridian Mobile
//!
//! The data layer caches the tenant context, tokens and profile it receives
//! at login, and reads them back before almost every request.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  meridian-client (ContextResolver, auth flows)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 meridian-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SessionStore  │───►│ DeviceStorage │◄───│ MemoryStorage│  │   │
//! │  │   │ typed access  │    │    (trait)    │    └──────────────┘  │   │
//! │  │   └───────────────┘    └───────▲───────┘    ┌──────────────┐  │   │
//! │  │                                └────────────│SqliteStorage │  │   │
//! │  │                                             │ (pool.rs)    │  │   │
//! │  │                                             └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meridian_store::{Database, DbConfig, SessionStore};
//! use std::sync::Arc;
//!
//! let db = Database::new(DbConfig::new("meridian.db")).await?;
//! let session = SessionStore::new(Arc::new(db.device_storage()));
//! let cmp = session.cmp_uuid().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use repository::device_storage::SqliteStorage;
pub use session::SessionStore;
pub use storage::{DeviceStorage, MemoryStorage};
