//! Placeholder scanning

use regex_lite::Regex;
use std::sync::OnceLock;

/// Matches `{identifier}`; the identifier is captured in group 1
pub(crate) fn placeholder_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// All placeholder identifiers in order of appearance, verbatim
pub fn extract_placeholders(text: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Remove the first `{placeholder}` occurrence of each identifier and trim.
///
/// Turns a templated quick-action such as `"Show sales for {region}"` into a
/// prompt label (`"Show sales for"`).
pub fn strip_placeholders<S: AsRef<str>>(text: &str, placeholders: &[S]) -> String {
    let mut stripped = text.to_string();
    for placeholder in placeholders {
        let token = format!("{{{}}}", placeholder.as_ref());
        stripped = stripped.replacen(&token, "", 1);
    }
    stripped.trim().to_string()
}

/// Human-readable label for an identifier: underscores become spaces and each
/// word is capitalized (`"start_date"` -> `"Start Date"`)
pub fn format_placeholder_label(identifier: &str) -> String {
    identifier
        .replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let upper: String = first.to_uppercase().collect();
                    format!("{}{}", upper, chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
