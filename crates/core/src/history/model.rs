use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated NAV observation for a fund.
///
/// History rows are keyed by (fund_name, nav_date); the series is
/// replaced as a whole on every sync, so there is no per-row identity
/// to preserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavHistoryPoint {
    pub fund_name: String,
    pub nav_date: NaiveDate,
    pub unit_nav: f64,
    /// Cumulative NAV; falls back to the unit NAV when the source
    /// carries neither a virtual nor a cumulative column.
    pub cumulative_nav: f64,
    pub daily_return: f64,
    pub total_assets: f64,
    pub market_value: f64,
    pub cost: f64,
    pub position_change: f64,
    pub daily_pnl: f64,
}
