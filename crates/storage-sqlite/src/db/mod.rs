//! Connection pooling and migrations.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel::{prelude::*, sql_query};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use crate::errors::StorageError;
use fundsync_core::errors::{DatabaseError, Error, Result};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = Arc<Pool<ConnectionManager<SqliteConnection>>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Creates the database file if needed, runs pending migrations, and
/// returns a ready connection pool.
pub fn init(db_path: &str) -> Result<DbPool> {
    if !Path::new(db_path).exists() {
        create_db_file(db_path)?;
    }
    run_migrations(db_path)?;
    create_pool(db_path)
}

pub fn create_pool(db_path: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(5)
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    let mut conn = pool
        .get()
        .map_err(|e| Error::Database(DatabaseError::ConnectionFailed(e.to_string())))?;
    // SQLite leaves both off by default.
    sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(StorageError::QueryFailed)?;
    sql_query("PRAGMA busy_timeout = 5000")
        .execute(&mut conn)
        .map_err(StorageError::QueryFailed)?;
    Ok(conn)
}

pub fn run_migrations(db_path: &str) -> Result<()> {
    let mut conn = SqliteConnection::establish(db_path)
        .map_err(|e| Error::Database(DatabaseError::ConnectionFailed(e.to_string())))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(DatabaseError::MigrationFailed(e.to_string())))?;
    if !applied.is_empty() {
        info!("Applied {} database migrations", applied.len());
    }
    Ok(())
}

fn create_db_file(db_path: &str) -> Result<()> {
    if let Some(db_dir) = Path::new(db_path).parent() {
        if !db_dir.exists() {
            fs::create_dir_all(db_dir)
                .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?;
        }
    }
    fs::File::create(db_path)
        .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?;
    Ok(())
}
