//! Quick-action prompts
//!
//! A quick action is a templated request such as
//! `"Sales for {region} since {start_date}"`. Before it can run, the user is
//! asked for a value per placeholder; this module builds that prompt and fills
//! the template with the answers.

use crate::{extract_placeholders, format_placeholder_label, populate_placeholders, strip_placeholders, PlaceholderSource};
use serde::{Deserialize, Serialize};

/// One value the user is asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptField {
    /// Identifier as written in the template
    pub identifier: String,
    /// Display label, e.g. `"Start Date"`
    pub label: String,
}

/// Prompt derived from a templated quick action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub template: String,
    /// Template text with the placeholders removed
    pub label: String,
    /// Distinct placeholders in order of first appearance
    pub fields: Vec<PromptField>,
}

impl PromptSpec {
    pub fn from_template(template: impl Into<String>) -> Self {
        let template = template.into();
        let placeholders = extract_placeholders(&template);
        let label = strip_placeholders(&template, &placeholders);

        let mut fields: Vec<PromptField> = Vec::new();
        for identifier in placeholders {
            if fields.iter().any(|f| f.identifier == identifier) {
                continue;
            }
            fields.push(PromptField {
                label: format_placeholder_label(&identifier),
                identifier,
            });
        }

        Self {
            template,
            label,
            fields,
        }
    }

    /// Whether the template needs any input at all
    pub fn needs_input(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Fields that `values` cannot answer
    pub fn missing_fields<S: PlaceholderSource + ?Sized>(&self, values: &S) -> Vec<&PromptField> {
        self.fields
            .iter()
            .filter(|f| values.lookup(&f.identifier).is_none())
            .collect()
    }

    /// Substitute the user's answers into the template
    pub fn fill<S: PlaceholderSource + ?Sized>(&self, values: &S) -> String {
        populate_placeholders(&self.template, values)
    }
}
