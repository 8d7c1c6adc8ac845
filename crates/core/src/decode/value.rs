use serde_json::Value;

/// Sentinel label for values that cannot be resolved to text.
/// This is the marker the source system itself uses for unset
/// categorical values, so it round-trips through the registry.
pub const UNKNOWN_LABEL: &str = "未知";

/// Unwraps a field value to its text content.
///
/// String passes through; an array yields its first element; an object
/// with a `text` property yields that; a `{type, value}` formula
/// wrapper recurses into `value`. Null and empty arrays yield
/// [`UNKNOWN_LABEL`]. Anything else degrades to a string coercion of
/// the raw value. Never fails.
pub fn extract_text(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN_LABEL.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => match items.first() {
            None => UNKNOWN_LABEL.to_string(),
            Some(first) => extract_text(first),
        },
        Value::Object(map) => {
            if let Some(inner) = map.get("value") {
                return extract_text(inner);
            }
            if let Some(Value::String(text)) = map.get("text") {
                return text.clone();
            }
            Value::Object(map.clone()).to_string()
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
    }
}

/// Parses a field value as a number, stripping percent, thousands and
/// currency symbols. Returns exactly `0.0` (never NaN or infinity) on
/// failure.
pub fn parse_number(value: &Value) -> f64 {
    parse_with_symbols(value, &['%', ',', '¥'])
}

/// Parses a monetary field value. Same unwrap rules as
/// [`parse_number`], but a percent sign is not stripped: a percent
/// where an amount is expected is bad data, not formatting.
pub fn parse_currency(value: &Value) -> f64 {
    parse_with_symbols(value, &[',', '¥'])
}

fn parse_with_symbols(value: &Value, symbols: &[char]) -> f64 {
    let parsed = match value {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| !symbols.contains(c)).collect();
            cleaned.trim().parse::<f64>().unwrap_or(0.0)
        }
        Value::Object(map) => match map.get("value") {
            Some(inner) => parse_with_symbols(inner, symbols),
            None => 0.0,
        },
        Value::Array(items) => match items.first() {
            Some(first) => parse_with_symbols(first, symbols),
            None => 0.0,
        },
        Value::Bool(_) => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_text_passes_strings_through() {
        assert_eq!(extract_text(&json!("中性")), "中性");
    }

    #[test]
    fn extract_text_takes_first_array_element() {
        assert_eq!(extract_text(&json!(["T0", "CTA"])), "T0");
        assert_eq!(extract_text(&json!([{"text": "张鹏"}])), "张鹏");
    }

    #[test]
    fn extract_text_unwraps_formula_wrapper() {
        // Formula fields nest the payload: {type: 3, value: ["T0"]}
        assert_eq!(extract_text(&json!({"type": 3, "value": ["T0"]})), "T0");
        assert_eq!(
            extract_text(&json!({"value": {"value": ["套利"]}})),
            "套利"
        );
    }

    #[test]
    fn extract_text_reads_text_property() {
        assert_eq!(extract_text(&json!({"text": "彭思宇"})), "彭思宇");
    }

    #[test]
    fn extract_text_degrades_on_null_and_empty() {
        assert_eq!(extract_text(&Value::Null), UNKNOWN_LABEL);
        assert_eq!(extract_text(&json!([])), UNKNOWN_LABEL);
    }

    #[test]
    fn extract_text_coerces_scalars() {
        assert_eq!(extract_text(&json!(1.085)), "1.085");
        assert_eq!(extract_text(&json!(true)), "true");
    }

    #[test]
    fn parse_number_strips_symbols() {
        assert_eq!(parse_number(&json!("12.5%")), 12.5);
        assert_eq!(parse_number(&json!("¥1,250,000")), 1_250_000.0);
        assert_eq!(parse_number(&json!(" 0.0342 ")), 0.0342);
    }

    #[test]
    fn parse_number_unwraps_nested_shapes() {
        assert_eq!(parse_number(&json!({"type": 2, "value": [0.018]})), 0.018);
        assert_eq!(parse_number(&json!([42.0])), 42.0);
        assert_eq!(parse_number(&json!({"value": ["3.5%"]})), 3.5);
    }

    #[test]
    fn parse_number_returns_zero_on_failure() {
        assert_eq!(parse_number(&Value::Null), 0.0);
        assert_eq!(parse_number(&json!("")), 0.0);
        assert_eq!(parse_number(&json!("n/a")), 0.0);
        assert_eq!(parse_number(&json!([])), 0.0);
        assert_eq!(parse_number(&json!({"type": 1})), 0.0);
        // "inf" parses as f64 infinity; the guard must coerce it.
        assert_eq!(parse_number(&json!("inf")), 0.0);
    }

    #[test]
    fn parse_currency_keeps_percent_as_invalid() {
        assert_eq!(parse_currency(&json!("¥2,500.75")), 2500.75);
        assert_eq!(parse_currency(&json!("12.5%")), 0.0);
    }
}
