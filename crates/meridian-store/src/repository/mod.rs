//! # Repository Module
//!
//! SQL-backed implementations of the storage collaborators.
//!
//! - [`SqliteStorage`](device_storage::SqliteStorage) - `device_storage` table

pub mod device_storage;
