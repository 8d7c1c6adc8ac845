use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tunables for the metric computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Annual risk-free rate used in the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Series shorter than this (after filtering invalid points)
    /// produce all-zero metrics.
    pub min_valid_points: usize,
    /// Trading days per year for annualizing daily volatility.
    pub trading_days: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
            min_valid_points: 2,
            trading_days: 252.0,
        }
    }
}

/// Derived metrics for one fund.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// Largest peak-to-trough decline, as a positive fraction.
    pub max_drawdown: f64,
    /// Annualized standard deviation of daily returns.
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Compound annual growth rate over the observed span.
    pub annualized_return: f64,
}

/// Computes the derived metrics from a date-ordered NAV series.
///
/// Points with a non-finite or non-positive NAV are dropped before any
/// arithmetic. Day-over-day returns are taken between consecutive
/// surviving points regardless of the calendar gap between them, which
/// matches how the valuations arrive (weekly for most funds).
pub fn calculate_risk_metrics(series: &[(NaiveDate, f64)], config: &RiskConfig) -> RiskMetrics {
    let valid: Vec<(NaiveDate, f64)> = series
        .iter()
        .filter(|(_, nav)| nav.is_finite() && *nav > 0.0)
        .copied()
        .collect();

    if valid.len() < config.min_valid_points.max(2) {
        return RiskMetrics::default();
    }

    let max_drawdown = max_drawdown(&valid);

    let returns: Vec<f64> = valid
        .windows(2)
        .map(|w| w[1].1 / w[0].1 - 1.0)
        .collect();

    let volatility = std_dev(&returns) * config.trading_days.sqrt();

    let (first_date, first_nav) = valid[0];
    let (last_date, last_nav) = valid[valid.len() - 1];
    let days = (last_date - first_date).num_days();
    let annualized_return = if days > 0 {
        (last_nav / first_nav).powf(365.0 / days as f64) - 1.0
    } else {
        0.0
    };

    let sharpe_ratio = if volatility > 0.0 {
        (annualized_return - config.risk_free_rate) / volatility
    } else {
        0.0
    };

    RiskMetrics {
        max_drawdown: finite_or_zero(max_drawdown),
        volatility: finite_or_zero(volatility),
        sharpe_ratio: finite_or_zero(sharpe_ratio),
        annualized_return: finite_or_zero(annualized_return),
    }
}

/// Largest decline from a running peak, as a positive fraction.
fn max_drawdown(series: &[(NaiveDate, f64)]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0f64;
    for &(_, nav) in series {
        if nav > peak {
            peak = nav;
        }
        let drawdown = (peak - nav) / peak;
        if drawdown > worst {
            worst = drawdown;
        }
    }
    worst
}

/// Sample standard deviation (n-1 denominator).
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
