//! Database models for the fund registry.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use fundsync_core::errors::{DatabaseError, Error};
use fundsync_core::funds::{Fund, FundDraft, FundStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for fund registry rows.
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    AsChangeset,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
)]
#[diesel(table_name = crate::schema::funds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FundDB {
    pub id: String,
    pub record_id: Option<String>,
    pub name: String,
    pub strategy: Option<String>,
    pub manager: Option<String>,
    pub status: String,
    pub latest_nav_date: Option<String>,
    pub establishment_date: Option<String>,
    pub cumulative_return: f64,
    pub yearly_return: f64,
    pub weekly_return: f64,
    pub daily_return: f64,
    pub daily_pnl: f64,
    pub weekly_pnl: f64,
    pub yearly_pnl: f64,
    pub concentration: f64,
    pub cost: f64,
    pub scale: f64,
    pub total_assets: f64,
    pub daily_capital_usage: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub volatility: f64,
    pub annualized_return: f64,
    pub source_table: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Fund> for FundDB {
    fn from(fund: &Fund) -> Self {
        Self {
            id: fund.id.clone(),
            record_id: fund.record_id.clone(),
            name: fund.name.clone(),
            strategy: fund.strategy.clone(),
            manager: fund.manager.clone(),
            status: fund.status.as_str().to_string(),
            latest_nav_date: fund.latest_nav_date.map(|d| d.format(DATE_FORMAT).to_string()),
            establishment_date: fund
                .establishment_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            cumulative_return: fund.cumulative_return,
            yearly_return: fund.yearly_return,
            weekly_return: fund.weekly_return,
            daily_return: fund.daily_return,
            daily_pnl: fund.daily_pnl,
            weekly_pnl: fund.weekly_pnl,
            yearly_pnl: fund.yearly_pnl,
            concentration: fund.concentration,
            cost: fund.cost,
            scale: fund.scale,
            total_assets: fund.total_assets,
            daily_capital_usage: fund.daily_capital_usage,
            max_drawdown: fund.max_drawdown,
            sharpe_ratio: fund.sharpe_ratio,
            volatility: fund.volatility,
            annualized_return: fund.annualized_return,
            source_table: fund.source_table.clone(),
            created_at: fund.created_at.to_rfc3339(),
            updated_at: fund.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<FundDB> for Fund {
    type Error = Error;

    fn try_from(row: FundDB) -> Result<Self, Self::Error> {
        Ok(Fund {
            id: row.id,
            record_id: row.record_id,
            name: row.name,
            strategy: row.strategy,
            manager: row.manager,
            status: FundStatus::from_str(&row.status)
                .map_err(|e| Error::Database(DatabaseError::Internal(e)))?,
            latest_nav_date: parse_opt_date(row.latest_nav_date.as_deref())?,
            establishment_date: parse_opt_date(row.establishment_date.as_deref())?,
            cumulative_return: row.cumulative_return,
            yearly_return: row.yearly_return,
            weekly_return: row.weekly_return,
            daily_return: row.daily_return,
            daily_pnl: row.daily_pnl,
            weekly_pnl: row.weekly_pnl,
            yearly_pnl: row.yearly_pnl,
            concentration: row.concentration,
            cost: row.cost,
            scale: row.scale,
            total_assets: row.total_assets,
            daily_capital_usage: row.daily_capital_usage,
            max_drawdown: row.max_drawdown,
            sharpe_ratio: row.sharpe_ratio,
            volatility: row.volatility,
            annualized_return: row.annualized_return,
            source_table: row.source_table,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Changeset for partial updates: only `Some` fields are written.
/// `updated_at` is always set by the repository.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::funds)]
pub struct UpdateFundDB {
    pub record_id: Option<String>,
    pub strategy: Option<String>,
    pub manager: Option<String>,
    pub status: Option<String>,
    pub latest_nav_date: Option<String>,
    pub establishment_date: Option<String>,
    pub cumulative_return: Option<f64>,
    pub yearly_return: Option<f64>,
    pub weekly_return: Option<f64>,
    pub daily_return: Option<f64>,
    pub daily_pnl: Option<f64>,
    pub weekly_pnl: Option<f64>,
    pub yearly_pnl: Option<f64>,
    pub concentration: Option<f64>,
    pub cost: Option<f64>,
    pub scale: Option<f64>,
    pub total_assets: Option<f64>,
    pub daily_capital_usage: Option<f64>,
    pub updated_at: String,
}

impl From<&FundDraft> for UpdateFundDB {
    fn from(draft: &FundDraft) -> Self {
        Self {
            record_id: if draft.record_id.is_empty() {
                None
            } else {
                Some(draft.record_id.clone())
            },
            strategy: draft.strategy.clone(),
            manager: draft.manager.clone(),
            status: draft.status.map(|s| s.as_str().to_string()),
            latest_nav_date: draft.latest_nav_date.map(|d| d.format(DATE_FORMAT).to_string()),
            establishment_date: draft
                .establishment_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            cumulative_return: draft.cumulative_return,
            yearly_return: draft.yearly_return,
            weekly_return: draft.weekly_return,
            daily_return: draft.daily_return,
            daily_pnl: draft.daily_pnl,
            weekly_pnl: draft.weekly_pnl,
            yearly_pnl: draft.yearly_pnl,
            concentration: draft.concentration,
            cost: draft.cost,
            scale: draft.scale,
            total_assets: draft.total_assets,
            daily_capital_usage: draft.daily_capital_usage,
            updated_at: Utc::now().to_rfc3339(),
        }
    }
}

fn parse_opt_date(value: Option<&str>) -> Result<Option<NaiveDate>, Error> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))
        })
        .transpose()
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))
}
