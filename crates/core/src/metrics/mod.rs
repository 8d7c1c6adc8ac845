//! Risk metrics derived from NAV time series.
//!
//! The calculator is pure: it takes a date-ordered NAV series and
//! produces the four derived metrics persisted on the fund row. All
//! arithmetic is plain f64 with a finiteness guard at the end, so a
//! degenerate series (single point, zero NAVs) yields zeros instead of
//! NaN poisoning the registry.

mod calculator;

pub use calculator::{calculate_risk_metrics, RiskConfig, RiskMetrics};
