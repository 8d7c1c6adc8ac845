use fundsync_bitable::BitableRecord;
use log::warn;

use super::model::NavHistoryPoint;
use crate::decode::{extract_text, parse_currency, parse_date, parse_number, UNKNOWN_LABEL};

// Column keys of the NAV extract sheet. Unlike the registry tables
// these are fixed: the history sheet has a single layout.
const KEY_NAME: &str = "基金名称";
const KEY_DATE: &str = "净值日期";
const KEY_UNIT_NAV: &str = "单位净值";
const KEY_VIRTUAL_NAV: &str = "虚拟净值";
const KEY_CUMULATIVE_NAV: &str = "累计净值";
const KEY_DAILY_RETURN: &str = "本年收益率";
const KEY_TOTAL_ASSETS: &str = "资产净值";
const KEY_COST: &str = "投资成本";
const KEY_MARKET_VALUE: &str = "市值";
const KEY_POSITION_CHANGE: &str = "持仓变化";
const KEY_DAILY_PNL: &str = "当日盈亏";

/// Builds NAV observations from the primary table's raw records.
///
/// Records without a resolvable fund name or valuation date are
/// skipped with a warning; a bad row in the sheet must not sink the
/// rest of the series. The cumulative NAV prefers the virtual-NAV
/// column, then the cumulative column, then falls back to the unit
/// NAV itself.
pub fn build_history(records: &[BitableRecord]) -> Vec<NavHistoryPoint> {
    let mut points = Vec::with_capacity(records.len());

    for record in records {
        let name = record
            .fields
            .get(KEY_NAME)
            .map(extract_text)
            .unwrap_or_default();
        if name.trim().is_empty() || name == UNKNOWN_LABEL {
            warn!("history record {} has no fund name, skipping", record.record_id);
            continue;
        }

        let Some(nav_date) = record.fields.get(KEY_DATE).and_then(parse_date) else {
            warn!(
                "history record {} ({}) has no valuation date, skipping",
                record.record_id, name
            );
            continue;
        };

        let number = |key: &str| record.fields.get(key).map(parse_number).unwrap_or(0.0);
        let currency = |key: &str| record.fields.get(key).map(parse_currency).unwrap_or(0.0);

        let unit_nav = number(KEY_UNIT_NAV);
        let cumulative_nav = record
            .fields
            .get(KEY_VIRTUAL_NAV)
            .or_else(|| record.fields.get(KEY_CUMULATIVE_NAV))
            .map(parse_number)
            .unwrap_or(unit_nav);

        points.push(NavHistoryPoint {
            fund_name: name,
            nav_date,
            unit_nav,
            cumulative_nav,
            daily_return: number(KEY_DAILY_RETURN),
            total_assets: currency(KEY_TOTAL_ASSETS),
            market_value: currency(KEY_MARKET_VALUE),
            cost: currency(KEY_COST),
            position_change: currency(KEY_POSITION_CHANGE),
            daily_pnl: currency(KEY_DAILY_PNL),
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(json: serde_json::Value) -> BitableRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn builds_points_and_skips_bad_rows() {
        let records = vec![
            record(json!({
                "record_id": "rec001",
                "fields": {
                    "基金名称": "示例基金一号",
                    "净值日期": "2025-11-14",
                    "单位净值": 1.052,
                    "虚拟净值": {"type": 2, "value": [1.103]},
                    "资产净值": "¥12,000,000",
                    "当日盈亏": "30,000"
                }
            })),
            // No date: skipped.
            record(json!({
                "record_id": "rec002",
                "fields": {"基金名称": "示例基金二号", "单位净值": 1.0}
            })),
            // No name: skipped.
            record(json!({
                "record_id": "rec003",
                "fields": {"净值日期": "2025-11-14", "单位净值": 1.0}
            })),
        ];

        let points = build_history(&records);
        assert_eq!(points.len(), 1);
        let point = &points[0];
        assert_eq!(point.fund_name, "示例基金一号");
        assert_eq!(point.nav_date, NaiveDate::from_ymd_opt(2025, 11, 14).unwrap());
        assert_eq!(point.unit_nav, 1.052);
        assert_eq!(point.cumulative_nav, 1.103);
        assert_eq!(point.total_assets, 12_000_000.0);
        assert_eq!(point.daily_pnl, 30_000.0);
        // Absent columns read as zero.
        assert_eq!(point.market_value, 0.0);
    }

    #[test]
    fn cumulative_nav_falls_back_to_unit_nav() {
        let points = build_history(&[record(json!({
            "record_id": "rec010",
            "fields": {
                "基金名称": "示例基金",
                "净值日期": "2025-11-14",
                "单位净值": 1.2
            }
        }))]);
        assert_eq!(points[0].cumulative_nav, 1.2);
    }

    #[test]
    fn cumulative_column_used_when_virtual_missing() {
        let points = build_history(&[record(json!({
            "record_id": "rec011",
            "fields": {
                "基金名称": "示例基金",
                "净值日期": "2025-11-14",
                "单位净值": 1.2,
                "累计净值": 1.8
            }
        }))]);
        assert_eq!(points[0].cumulative_nav, 1.8);
    }
}
