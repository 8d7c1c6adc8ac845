use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decode::UNKNOWN_LABEL;

/// Lifecycle status of a fund position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundStatus {
    #[default]
    Normal,
    Redeemed,
}

impl FundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundStatus::Normal => "normal",
            FundStatus::Redeemed => "redeemed",
        }
    }

    /// Maps a resolved source label to a status. The source writes the
    /// labels in Chinese; anything unrecognized reads as `None` so the
    /// insert default applies instead of clobbering a stored value.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "正常" | "normal" => Some(FundStatus::Normal),
            "已赎回" | "redeemed" => Some(FundStatus::Redeemed),
            _ => None,
        }
    }
}

impl std::str::FromStr for FundStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(FundStatus::Normal),
            "redeemed" => Ok(FundStatus::Redeemed),
            other => Err(format!("unknown fund status '{}'", other)),
        }
    }
}

/// A persisted fund registry entry.
///
/// Business identity is (name, manager) with manager nullable; two
/// distinct funds sharing a name with no manager set cannot be told
/// apart (documented limitation of the source data).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    /// Internal identity, allocated on insert and never changed.
    pub id: String,
    /// Record id in the external source, when known.
    pub record_id: Option<String>,
    pub name: String,
    pub strategy: Option<String>,
    pub manager: Option<String>,
    pub status: FundStatus,
    pub latest_nav_date: Option<NaiveDate>,
    pub establishment_date: Option<NaiveDate>,

    // Financials from the source tables.
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

    // Derived from the NAV history by the metrics recompute.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub volatility: f64,
    pub annualized_return: f64,

    /// Which configured table this row came from.
    pub source_table: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fund {
    /// Whether the manager is effectively unset for matching purposes.
    pub fn manager_is_unset(&self) -> bool {
        match self.manager.as_deref() {
            None => true,
            Some(m) => m.is_empty() || m == UNKNOWN_LABEL,
        }
    }
}

/// A normalized incoming record, before reconciliation.
///
/// Every field except the name is optional: only fields actually
/// present on the source record are set, and only set fields are
/// written on update (non-destructive partial merge).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundDraft {
    pub record_id: String,
    pub name: String,
    pub strategy: Option<String>,
    pub manager: Option<String>,
    pub status: Option<FundStatus>,
    pub latest_nav_date: Option<NaiveDate>,
    pub establishment_date: Option<NaiveDate>,
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
    pub source_table: String,
}

impl FundDraft {
    /// Materializes a new registry entry from this draft. Absent
    /// numeric fields default to zero and the status to `normal`;
    /// identity is freshly allocated.
    pub fn into_new_fund(self) -> Fund {
        let now = Utc::now();
        Fund {
            id: Uuid::new_v4().to_string(),
            record_id: Some(self.record_id),
            name: self.name,
            strategy: self.strategy,
            manager: self.manager,
            status: self.status.unwrap_or_default(),
            latest_nav_date: self.latest_nav_date,
            establishment_date: self.establishment_date,
            cumulative_return: self.cumulative_return.unwrap_or(0.0),
            yearly_return: self.yearly_return.unwrap_or(0.0),
            weekly_return: self.weekly_return.unwrap_or(0.0),
            daily_return: self.daily_return.unwrap_or(0.0),
            daily_pnl: self.daily_pnl.unwrap_or(0.0),
            weekly_pnl: self.weekly_pnl.unwrap_or(0.0),
            yearly_pnl: self.yearly_pnl.unwrap_or(0.0),
            concentration: self.concentration.unwrap_or(0.0),
            cost: self.cost.unwrap_or(0.0),
            scale: self.scale.unwrap_or(0.0),
            total_assets: self.total_assets.unwrap_or(0.0),
            daily_capital_usage: self.daily_capital_usage.unwrap_or(0.0),
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            volatility: 0.0,
            annualized_return: 0.0,
            source_table: self.source_table,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the manager is effectively unset for matching purposes.
    pub fn manager_is_unset(&self) -> bool {
        match self.manager.as_deref() {
            None => true,
            Some(m) => m.is_empty() || m == UNKNOWN_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_source_labels() {
        assert_eq!(FundStatus::from_label("正常"), Some(FundStatus::Normal));
        assert_eq!(FundStatus::from_label("已赎回"), Some(FundStatus::Redeemed));
        assert_eq!(FundStatus::from_label("optUnknown"), None);
    }

    #[test]
    fn new_fund_gets_zero_defaults_and_normal_status() {
        let draft = FundDraft {
            record_id: "rec001".to_string(),
            name: "示例基金".to_string(),
            source_table: "main".to_string(),
            ..Default::default()
        };
        let fund = draft.into_new_fund();

        assert!(!fund.id.is_empty());
        assert_eq!(fund.status, FundStatus::Normal);
        assert_eq!(fund.weekly_return, 0.0);
        assert_eq!(fund.cost, 0.0);
        assert_eq!(fund.max_drawdown, 0.0);
    }

    #[test]
    fn unknown_manager_counts_as_unset() {
        let mut draft = FundDraft {
            name: "x".to_string(),
            ..Default::default()
        };
        assert!(draft.manager_is_unset());
        draft.manager = Some("未知".to_string());
        assert!(draft.manager_is_unset());
        draft.manager = Some("张鹏".to_string());
        assert!(!draft.manager_is_unset());
    }
}
