//! Placeholder substitution

use crate::scan::placeholder_regex;
use crate::PlaceholderSource;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex_lite::Captures;
use serde_json::Value;

/// Replace every resolvable `{identifier}` in `text` with its value.
///
/// ISO-8601 date strings are rendered as `YYYY-MM-DD`. Tokens that do not
/// resolve are left untouched.
pub fn populate_placeholders<S: PlaceholderSource + ?Sized>(text: &str, source: &S) -> String {
    placeholder_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let identifier = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match source.lookup(identifier) {
                Some(value) => format_iso_date(&value).unwrap_or(value),
                None => caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string(),
            }
        })
        .into_owned()
}

/// Render a JSON value for display inside text
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Reformat an ISO-8601 date or timestamp as `YYYY-MM-DD`.
///
/// The calendar date is taken as written, in the timestamp's own offset.
/// Returns `None` for anything that is not an ISO-8601 date.
pub fn format_iso_date(value: &str) -> Option<String> {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        dt.date_naive()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.date()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        dt.date()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        dt.date()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        dt.date()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?
    };

    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_populate_nested() {
        let record = json!({"user": {"name": "Ann"}});
        assert_eq!(populate_placeholders("Hi {user.name}", &record), "Hi Ann");
    }

    #[test]
    fn test_unresolved_left_verbatim() {
        let record = json!({"user": {"name": "Ann"}});
        assert_eq!(populate_placeholders("Hi {user.missing}", &record), "Hi {user.missing}");
        assert_eq!(populate_placeholders("{a}{b}", &json!({})), "{a}{b}");
    }

    #[test]
    fn test_iso_timestamp_is_formatted() {
        let record = json!({"created": "2024-03-05T10:00:00Z"});
        assert_eq!(populate_placeholders("On {created}", &record), "On 2024-03-05");
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(format_iso_date("2024-03-05T23:30:00-05:00").as_deref(), Some("2024-03-05"));
        assert_eq!(format_iso_date("2024-03-05T10:00:00.123").as_deref(), Some("2024-03-05"));
        assert_eq!(format_iso_date("2024-03-05T10:00").as_deref(), Some("2024-03-05"));
        assert_eq!(format_iso_date("2024-03-05 10:00:00").as_deref(), Some("2024-03-05"));
        assert_eq!(format_iso_date("2024-03-05 10:00:00.250").as_deref(), Some("2024-03-05"));
        assert_eq!(format_iso_date("2024-03-05 10:00").as_deref(), Some("2024-03-05"));
        assert_eq!(format_iso_date("2024-03-05").as_deref(), Some("2024-03-05"));
        assert_eq!(format_iso_date("2024-13-05"), None);
        assert_eq!(format_iso_date("March 5"), None);
        assert_eq!(format_iso_date("12345"), None);
    }

    #[test]
    fn test_render_values() {
        assert_eq!(render_value(&json!(30)), "30");
        assert_eq!(render_value(&json!(30.0)), "30");
        assert_eq!(render_value(&json!(12.5)), "12.5");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!(null)), "");
        assert_eq!(render_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_null_value_substitutes_empty() {
        let record = json!({"note": null});
        assert_eq!(populate_placeholders("[{note}]", &record), "[]");
    }

    #[test]
    fn test_populate_multiple_and_repeated() {
        let record = json!({"a": 1, "b": "two"});
        assert_eq!(populate_placeholders("{a}-{b}-{a}-{c}", &record), "1-two-1-{c}");
    }
}
