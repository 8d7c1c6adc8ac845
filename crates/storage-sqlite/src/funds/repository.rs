use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::model::{FundDB, UpdateFundDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::funds::dsl as funds_dsl;
use fundsync_core::funds::{Fund, FundDraft, FundStore};
use fundsync_core::metrics::RiskMetrics;
use fundsync_core::Result;

pub struct FundRepository {
    pool: DbPool,
}

impl FundRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Full registry dump, newest first. Serves the read API.
    pub fn list_all(&self) -> Result<Vec<Fund>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = funds_dsl::funds
            .order(funds_dsl::updated_at.desc())
            .load::<FundDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(Fund::try_from).collect()
    }
}

#[async_trait]
impl FundStore for FundRepository {
    fn find_by_name(&self, name: &str) -> Result<Vec<Fund>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = funds_dsl::funds
            .filter(funds_dsl::name.eq(name))
            .order(funds_dsl::created_at.asc())
            .load::<FundDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(Fund::try_from).collect()
    }

    async fn insert(&self, fund: &Fund) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let row = FundDB::from(fund);
        diesel::insert_into(funds_dsl::funds)
            .values(&row)
            .execute(&mut conn)
            .into_core()?;
        Ok(())
    }

    async fn update(&self, id: &str, draft: &FundDraft) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let changes = UpdateFundDB::from(draft);
        diesel::update(funds_dsl::funds.filter(funds_dsl::id.eq(id)))
            .set(&changes)
            .execute(&mut conn)
            .into_core()?;
        Ok(())
    }

    async fn update_metrics(&self, name: &str, metrics: &RiskMetrics) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        diesel::update(funds_dsl::funds.filter(funds_dsl::name.eq(name)))
            .set((
                funds_dsl::max_drawdown.eq(metrics.max_drawdown),
                funds_dsl::sharpe_ratio.eq(metrics.sharpe_ratio),
                funds_dsl::volatility.eq(metrics.volatility),
                funds_dsl::annualized_return.eq(metrics.annualized_return),
                funds_dsl::updated_at.eq(Utc::now().to_rfc3339()),
            ))
            .execute(&mut conn)
            .into_core()
    }
}
