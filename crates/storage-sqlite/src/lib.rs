//! SQLite storage implementation for the fund registry.
//!
//! This crate provides all database-related functionality using Diesel
//! ORM with SQLite. It implements the store traits defined in
//! `fundsync-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for funds, NAV history, and sync logs
//! - Database-specific model types (with Diesel derives)
//!
//! This is the only crate in the workspace where Diesel dependencies
//! exist; `core` and `bitable` are database-agnostic and work with
//! traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod funds;
pub mod history;
pub mod sync_logs;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from fundsync-core for convenience
pub use fundsync_core::errors::{DatabaseError, Error, Result};
