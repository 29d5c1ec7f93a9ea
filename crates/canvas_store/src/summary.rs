//! Derived canvas metadata

use canvas_model::{CanvasDocument, PageConfig, Widget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Element counts and page configuration of a canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSummary {
    pub element_count: usize,
    /// Count per widget type name
    pub element_types: BTreeMap<String, usize>,
    pub page_key: String,
    pub page_label: String,
}

impl CanvasSummary {
    pub fn new(widgets: &[Widget], page: &PageConfig) -> Self {
        let mut element_types = BTreeMap::new();
        for widget in widgets {
            *element_types
                .entry(widget.kind.as_str().to_string())
                .or_insert(0) += 1;
        }
        Self {
            element_count: widgets.len(),
            element_types,
            page_key: page.key.clone(),
            page_label: page.label.clone(),
        }
    }

    pub fn of(document: &CanvasDocument) -> Self {
        Self::new(document.widgets(), document.page())
    }

    /// Metadata block written into serialized canvases
    pub fn to_metadata(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

impl std::fmt::Display for CanvasSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Page: {} ({})", self.page_label, self.page_key)?;
        writeln!(f, "Elements: {}", self.element_count)?;
        for (kind, count) in &self.element_types {
            writeln!(f, "  {}: {}", kind, count)?;
        }
        Ok(())
    }
}
