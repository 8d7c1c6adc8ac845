use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::NavHistoryPoint;
use crate::errors::Result;

/// Persistence seam for NAV history series.
#[async_trait]
pub trait NavHistoryStore: Send + Sync {
    /// Replaces the entire stored history with `points` in one
    /// transaction; on failure the previous series survives intact.
    /// Returns the number of rows written.
    async fn replace_all(&self, points: &[NavHistoryPoint]) -> Result<usize>;

    /// Names of all funds that currently have history rows.
    fn distinct_fund_names(&self) -> Result<Vec<String>>;

    /// Date-ordered cumulative-NAV series for one fund.
    fn series_for(&self, fund_name: &str) -> Result<Vec<(NaiveDate, f64)>>;
}
