use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

/// Spreadsheet serial dates land in this range for plausible NAV
/// dates (2009..2064); numbers outside it are epoch milliseconds.
const SERIAL_DATE_MIN: f64 = 40_000.0;
const SERIAL_DATE_MAX: f64 = 60_000.0;

/// The source emits timestamps as the UTC instant of a UTC+8 midnight;
/// shifting by this offset before taking the date recovers the
/// calendar day the sheet displays.
const SOURCE_UTC_OFFSET_HOURS: i64 = 8;

/// Parses a field value as a calendar date.
///
/// Accepts ISO-like strings (`2025-11-17`, with or without a time
/// part), slash-delimited `year/month/day` strings, and numbers: a
/// number in the spreadsheet-serial range is interpreted as a serial
/// day count, anything else as an epoch-millisecond timestamp.
/// Arrays and wrapper objects are unwrapped with the same rules as
/// the other decoders. Returns `None` when nothing parses.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => parse_numeric_date(n.as_f64()?),
        Value::String(s) => parse_date_str(s),
        Value::Array(items) => parse_date(items.first()?),
        Value::Object(map) => {
            if let Some(inner) = map.get("value") {
                return parse_date(inner);
            }
            if let Some(Value::String(text)) = map.get("text") {
                return parse_date_str(text);
            }
            None
        }
        _ => None,
    }
}

/// Like [`parse_date`], but falls back to today's date when the input
/// is unparseable. This default is intentional but lossy; callers that
/// need a hard failure must use [`parse_date`] and check.
pub fn parse_date_or_today(value: &Value) -> NaiveDate {
    parse_date(value).unwrap_or_else(|| Utc::now().date_naive())
}

fn parse_numeric_date(raw: f64) -> Option<NaiveDate> {
    if !raw.is_finite() {
        return None;
    }

    if raw > SERIAL_DATE_MIN && raw < SERIAL_DATE_MAX {
        // Serial day count with a 1900 epoch. Day 1 is 1900-01-01 and
        // the epoch also absorbs the historical leap-year off-by-two,
        // which nets out to an 1899-12-30 base date.
        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        return base.checked_add_signed(Duration::days(raw as i64));
    }

    let instant = Utc.timestamp_millis_opt(raw as i64).single()?;
    Some((instant + Duration::hours(SOURCE_UTC_OFFSET_HOURS)).date_naive())
}

fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // ISO-like: take the date part, drop any time component.
    if trimmed.contains('-') {
        let date_part = trimmed.split('T').next().unwrap_or(trimmed);
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }

    // Slash-delimited year/month/day, as entered by hand in the sheet.
    if trimmed.contains('/') {
        let mut parts = trimmed.splitn(3, '/');
        let year: i32 = parts.next()?.trim().parse().ok()?;
        let month: u32 = parts.next()?.trim().parse().ok()?;
        let day: u32 = parts.next()?.trim().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_iso_strings() {
        assert_eq!(
            parse_date(&json!("2025-11-17")),
            NaiveDate::from_ymd_opt(2025, 11, 17)
        );
        assert_eq!(
            parse_date(&json!("2025-11-17T00:00:00.000Z")),
            NaiveDate::from_ymd_opt(2025, 11, 17)
        );
    }

    #[test]
    fn parses_slash_strings() {
        assert_eq!(
            parse_date(&json!("2025/11/17")),
            NaiveDate::from_ymd_opt(2025, 11, 17)
        );
        assert_eq!(
            parse_date(&json!("2025/3/5")),
            NaiveDate::from_ymd_opt(2025, 3, 5)
        );
    }

    #[test]
    fn is_idempotent_on_canonical_strings() {
        let canonical = "2025-01-31";
        let first = parse_date(&json!(canonical)).unwrap();
        let second = parse_date(&json!(first.format("%Y-%m-%d").to_string())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn interprets_serial_range_as_spreadsheet_date() {
        // Serial 45000 is 2023-03-15 against the 1899-12-30 base.
        assert_eq!(
            parse_date(&json!(45000)),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
    }

    #[test]
    fn interprets_large_numbers_as_epoch_millis() {
        // 2025-01-14T16:00:00Z is midnight 2025-01-15 in UTC+8.
        assert_eq!(
            parse_date(&json!(1736870400000_i64)),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }

    #[test]
    fn unwraps_nested_shapes() {
        assert_eq!(
            parse_date(&json!([{"text": "2025/11/17"}])),
            NaiveDate::from_ymd_opt(2025, 11, 17)
        );
        assert_eq!(
            parse_date(&json!({"type": 5, "value": [1736870400000_i64]})),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(&json!("")), None);
        assert_eq!(parse_date(&json!("soon")), None);
        assert_eq!(parse_date(&Value::Null), None);
        assert_eq!(parse_date(&json!([])), None);
    }

    #[test]
    fn fallback_returns_today_for_garbage() {
        assert_eq!(parse_date_or_today(&json!("soon")), Utc::now().date_naive());
    }
}
