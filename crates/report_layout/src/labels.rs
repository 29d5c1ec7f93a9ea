//! Localized column labels
//!
//! Column keys are resolved to display labels through a pluggable
//! [`ColumnLabelResolver`]. The lookup order is the preferred language, then
//! English, then the raw column key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language every label set is expected to carry
pub const CANONICAL_LANGUAGE: &str = "en";

/// One label in several languages, keyed by language tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedLabel {
    texts: BTreeMap<String, String>,
}

impl LocalizedLabel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label with only the canonical language
    pub fn english(text: impl Into<String>) -> Self {
        Self::new().with(CANONICAL_LANGUAGE, text)
    }

    pub fn with(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(language, text);
        self
    }

    pub fn insert(&mut self, language: impl Into<String>, text: impl Into<String>) {
        self.texts.insert(language.into(), text.into());
    }

    /// Exact lookup; blank texts count as missing
    pub fn get(&self, language: &str) -> Option<&str> {
        self.texts
            .get(language)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    /// Preferred language, falling back to English
    pub fn resolve(&self, preferred: &str) -> Option<&str> {
        self.get(preferred).or_else(|| self.get(CANONICAL_LANGUAGE))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.texts.keys().map(String::as_str)
    }
}

/// Source of translated column labels
pub trait ColumnLabelResolver {
    /// Label for `column` in exactly `language`, if known
    fn lookup(&self, column: &str, language: &str) -> Option<String>;
}

impl<F> ColumnLabelResolver for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn lookup(&self, column: &str, language: &str) -> Option<String> {
        self(column, language)
    }
}

/// Labels for a set of column keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCatalog {
    labels: BTreeMap<String, LocalizedLabel>,
}

impl LabelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with(mut self, column: impl Into<String>, label: LocalizedLabel) -> Self {
        self.insert(column, label);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, label: LocalizedLabel) {
        self.labels.insert(column.into(), label);
    }

    pub fn get(&self, column: &str) -> Option<&LocalizedLabel> {
        self.labels.get(column)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl ColumnLabelResolver for LabelCatalog {
    fn lookup(&self, column: &str, language: &str) -> Option<String> {
        self.get(column)?.get(language).map(str::to_string)
    }
}

/// Display label for a column: preferred language, then English, then the key
pub fn resolve_column_label(
    column: &str,
    language: &str,
    resolver: Option<&dyn ColumnLabelResolver>,
) -> String {
    resolver
        .and_then(|r| {
            r.lookup(column, language)
                .or_else(|| r.lookup(column, CANONICAL_LANGUAGE))
        })
        .unwrap_or_else(|| column.to_string())
}
