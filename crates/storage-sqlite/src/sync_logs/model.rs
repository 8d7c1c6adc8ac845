//! Database model for the sync audit trail.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fundsync_core::errors::{DatabaseError, Error};
use fundsync_core::sync::SyncLogEntry;

#[derive(
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = crate::schema::sync_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SyncLogDB {
    pub id: String,
    pub ran_at: String,
    pub success: bool,
    pub records_processed: i32,
    pub records_inserted: i32,
    pub records_updated: i32,
    pub error_message: Option<String>,
    pub duration_ms: i64,
}

impl From<&SyncLogEntry> for SyncLogDB {
    fn from(entry: &SyncLogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            ran_at: entry.ran_at.to_rfc3339(),
            success: entry.success,
            records_processed: entry.records_processed,
            records_inserted: entry.records_inserted,
            records_updated: entry.records_updated,
            error_message: entry.error_message.clone(),
            duration_ms: entry.duration_ms,
        }
    }
}

impl TryFrom<SyncLogDB> for SyncLogEntry {
    type Error = Error;

    fn try_from(row: SyncLogDB) -> Result<Self, Self::Error> {
        let ran_at = DateTime::parse_from_rfc3339(&row.ran_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?;
        Ok(SyncLogEntry {
            id: row.id,
            ran_at,
            success: row.success,
            records_processed: row.records_processed,
            records_inserted: row.records_inserted,
            records_updated: row.records_updated,
            error_message: row.error_message,
            duration_ms: row.duration_ms,
        })
    }
}
