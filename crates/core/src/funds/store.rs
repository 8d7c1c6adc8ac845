use async_trait::async_trait;

use super::model::{Fund, FundDraft};
use crate::errors::Result;
use crate::metrics::RiskMetrics;

/// Storage interface for the fund registry.
///
/// Reads are sync (fast local queries); mutations are async, matching
/// the rest of the pipeline. Implemented by the SQLite repository and
/// by in-memory mocks in tests.
#[async_trait]
pub trait FundStore: Send + Sync {
    /// All registry entries sharing a name, in insertion order.
    /// Input to the match heuristic.
    fn find_by_name(&self, name: &str) -> Result<Vec<Fund>>;

    /// Inserts a new entry. The caller allocates identity.
    async fn insert(&self, fund: &Fund) -> Result<()>;

    /// Partial update: only fields set on the draft are written,
    /// everything else keeps its stored value. `updated_at` is always
    /// refreshed. Identity never changes.
    async fn update(&self, id: &str, draft: &FundDraft) -> Result<()>;

    /// Writes recomputed risk metrics onto every entry with this fund
    /// name. Returns the number of rows touched.
    async fn update_metrics(&self, name: &str, metrics: &RiskMetrics) -> Result<usize>;
}
