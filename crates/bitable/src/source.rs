use async_trait::async_trait;

use crate::errors::BitableError;
use crate::models::{BitableRecord, TableField};

/// Read-only view of a Bitable app used by the sync pipeline.
///
/// `BitableClient` is the production implementation; tests drive the
/// orchestrator with an in-memory mock instead.
#[async_trait]
pub trait BitableSource: Send + Sync {
    /// Obtains (or refreshes) an access credential. Called once before
    /// a sync run; total failure here aborts the run.
    async fn ensure_credential(&self) -> Result<(), BitableError>;

    /// Fetches every record of a table, following pagination to the end.
    async fn list_records(
        &self,
        app_token: &str,
        table_id: &str,
    ) -> Result<Vec<BitableRecord>, BitableError>;

    /// Fetches the field schema of a table (for option-code resolution).
    async fn list_fields(
        &self,
        app_token: &str,
        table_id: &str,
    ) -> Result<Vec<TableField>, BitableError>;
}
