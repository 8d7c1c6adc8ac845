use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// True when the run produced no errors. Warnings (empty tables,
    /// skipped records) do not affect success.
    pub success: bool,
    pub records_processed: usize,
    pub records_inserted: usize,
    pub records_updated: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl SyncReport {
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// One persisted row of the sync audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLogEntry {
    pub id: String,
    pub ran_at: DateTime<Utc>,
    pub success: bool,
    pub records_processed: i32,
    pub records_inserted: i32,
    pub records_updated: i32,
    /// Joined error lines, when any.
    pub error_message: Option<String>,
    pub duration_ms: i64,
}

impl SyncLogEntry {
    pub fn from_report(report: &SyncReport, ran_at: DateTime<Utc>, duration_ms: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ran_at,
            success: report.success,
            records_processed: report.records_processed as i32,
            records_inserted: report.records_inserted as i32,
            records_updated: report.records_updated as i32,
            error_message: if report.errors.is_empty() {
                None
            } else {
                Some(report.errors.join("; "))
            },
            duration_ms,
        }
    }
}

/// Persistence seam for the sync audit trail.
#[async_trait]
pub trait SyncLogStore: Send + Sync {
    async fn append(&self, entry: &SyncLogEntry) -> Result<()>;

    /// Most recent entries, newest first.
    fn recent(&self, limit: i64) -> Result<Vec<SyncLogEntry>>;
}
