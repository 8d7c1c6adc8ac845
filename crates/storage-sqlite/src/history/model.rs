//! Database model for NAV history rows.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fundsync_core::errors::{DatabaseError, Error};
use fundsync_core::history::NavHistoryPoint;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
)]
#[diesel(table_name = crate::schema::nav_history)]
#[diesel(primary_key(fund_name, nav_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NavHistoryDB {
    pub fund_name: String,
    pub nav_date: String,
    pub unit_nav: f64,
    pub cumulative_nav: f64,
    pub daily_return: f64,
    pub total_assets: f64,
    pub market_value: f64,
    pub cost: f64,
    pub position_change: f64,
    pub daily_pnl: f64,
}

impl From<&NavHistoryPoint> for NavHistoryDB {
    fn from(point: &NavHistoryPoint) -> Self {
        Self {
            fund_name: point.fund_name.clone(),
            nav_date: point.nav_date.format(DATE_FORMAT).to_string(),
            unit_nav: point.unit_nav,
            cumulative_nav: point.cumulative_nav,
            daily_return: point.daily_return,
            total_assets: point.total_assets,
            market_value: point.market_value,
            cost: point.cost,
            position_change: point.position_change,
            daily_pnl: point.daily_pnl,
        }
    }
}

impl TryFrom<NavHistoryDB> for NavHistoryPoint {
    type Error = Error;

    fn try_from(row: NavHistoryDB) -> Result<Self, Self::Error> {
        Ok(NavHistoryPoint {
            nav_date: parse_date(&row.nav_date)?,
            fund_name: row.fund_name,
            unit_nav: row.unit_nav,
            cumulative_nav: row.cumulative_nav,
            daily_return: row.daily_return,
            total_assets: row.total_assets,
            market_value: row.market_value,
            cost: row.cost,
            position_change: row.position_change,
            daily_pnl: row.daily_pnl,
        })
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))
}
