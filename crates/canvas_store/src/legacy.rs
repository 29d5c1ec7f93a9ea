//! Legacy storage artifacts
//!
//! Layouts stored in a JSON column are sometimes delivered as a JSON string
//! holding the JSON text, i.e. wrapped in quotes with every inner quote
//! escaped.

use std::borrow::Cow;

/// Layers of quote-wrapping peeled before giving up
const MAX_UNWRAP_DEPTH: usize = 4;

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

fn unwrap_once(text: &str) -> String {
    // a proper JSON string literal decodes every escape; otherwise fall back
    // to stripping the quotes and unescaping \" only
    match serde_json::from_str::<String>(text) {
        Ok(inner) => inner,
        Err(_) => text[1..text.len() - 1].replace("\\\"", "\""),
    }
}

/// Strip redundant quote layers from raw canvas text
pub fn unwrap_quoted(raw: &str) -> Cow<'_, str> {
    let mut text = Cow::Borrowed(raw.trim());
    for _ in 0..MAX_UNWRAP_DEPTH {
        if !is_quoted(&text) {
            break;
        }
        tracing::debug!("unwrapping quote-wrapped canvas text");
        text = Cow::Owned(unwrap_once(&text).trim().to_string());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        let raw = "  {\"elements\":[]} ";
        assert!(matches!(unwrap_quoted(raw), Cow::Borrowed("{\"elements\":[]}")));
    }

    #[test]
    fn test_json_string_literal() {
        let inner = r#"{"elements":[{"text":"a \"quoted\" word\\path"}]}"#;
        let wrapped = serde_json::to_string(inner).unwrap();
        assert_eq!(unwrap_quoted(&wrapped), inner);
    }

    #[test]
    fn test_naive_escaping_fallback() {
        let inner = r#"{"text":"say \"hi\""}"#;
        let wrapped = format!("\"{}\"", inner.replace('"', "\\\""));
        assert_eq!(unwrap_quoted(&wrapped), inner);
    }

    #[test]
    fn test_double_wrapped() {
        let inner = r#"{"elements":[]}"#;
        let once = serde_json::to_string(inner).unwrap();
        let twice = serde_json::to_string(&once).unwrap();
        assert_eq!(unwrap_quoted(&twice), inner);
    }

    #[test]
    fn test_lone_quote_is_not_unwrapped() {
        assert_eq!(unwrap_quoted("\""), "\"");
    }
}
