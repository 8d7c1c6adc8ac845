use async_trait::async_trait;
use diesel::prelude::*;

use super::model::SyncLogDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::sync_logs::dsl as sync_logs_dsl;
use fundsync_core::sync::{SyncLogEntry, SyncLogStore};
use fundsync_core::Result;

pub struct SyncLogRepository {
    pool: DbPool,
}

impl SyncLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncLogStore for SyncLogRepository {
    async fn append(&self, entry: &SyncLogEntry) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let row = SyncLogDB::from(entry);
        diesel::insert_into(sync_logs_dsl::sync_logs)
            .values(&row)
            .execute(&mut conn)
            .into_core()?;
        Ok(())
    }

    fn recent(&self, limit: i64) -> Result<Vec<SyncLogEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = sync_logs_dsl::sync_logs
            .order(sync_logs_dsl::ran_at.desc())
            .limit(limit)
            .load::<SyncLogDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(SyncLogEntry::try_from).collect()
    }
}
