//! Page planning
//!
//! Rows are split into fixed-size chunks, one per printed page. Each page
//! gets a [`PageRenderSpec`] saying what a renderer draws on it:
//!
//! - the page's rows and the table columns (from the dataset's first row);
//! - on the first page, the headings and every free-form canvas element;
//! - on the last page, the footer text and footer elements.
//!
//! Text on those elements has its `{placeholders}` filled from the plan
//! context. A dataset with no rows yields no pages.

use crate::labels::{resolve_column_label, ColumnLabelResolver, CANONICAL_LANGUAGE};
use crate::{Dataset, Row};
use canvas_model::{CanvasDocument, Widget, WidgetKind};
use placeholders::populate_placeholders;
use serde::{Deserialize, Serialize};

/// Rows that fit on one printed page
pub const ROWS_PER_PAGE: usize = 40;

/// Split rows into consecutive chunks of at most `rows_per_page`.
///
/// A chunk size of zero is treated as one.
pub fn paginate<T>(rows: &[T], rows_per_page: usize) -> Vec<&[T]> {
    rows.chunks(rows_per_page.max(1)).collect()
}

/// A table column as rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
}

/// Everything a renderer needs for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRenderSpec {
    /// 1-based
    pub page_number: usize,
    pub total_pages: usize,
    pub is_first: bool,
    pub is_last: bool,
    /// Index of this page's first row within the whole dataset
    pub row_offset: usize,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
    /// Populated headings; empty except on the first page
    pub headings: Vec<String>,
    /// Populated footer text; only on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Canvas elements drawn on this page, text already populated
    pub elements: Vec<Widget>,
    /// Placement of the data table, if the canvas has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Widget>,
}

/// Settings for one planning run
pub struct PlanOptions<'a> {
    pub rows_per_page: usize,
    /// Preferred language for column labels
    pub language: String,
    /// Values for placeholders in headings, footers and element text
    pub context: Row,
    pub resolver: Option<&'a dyn ColumnLabelResolver>,
}

impl Default for PlanOptions<'_> {
    fn default() -> Self {
        Self {
            rows_per_page: ROWS_PER_PAGE,
            language: CANONICAL_LANGUAGE.to_string(),
            context: Row::new(),
            resolver: None,
        }
    }
}

impl<'a> PlanOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_context(mut self, context: Row) -> Self {
        self.context = context;
        self
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ColumnLabelResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    fn populate(&self, text: &str) -> String {
        populate_placeholders(text, &self.context)
    }

    fn populated(&self, widget: &Widget) -> Widget {
        let mut widget = widget.clone();
        if widget.kind.has_text() {
            widget.text = self.populate(&widget.text);
        }
        widget
    }
}

/// Resolve the dataset's columns to display labels
pub fn resolve_columns(dataset: &Dataset, options: &PlanOptions<'_>) -> Vec<ColumnSpec> {
    dataset
        .resolved_columns()
        .into_iter()
        .map(|key| {
            let label = resolve_column_label(&key, &options.language, options.resolver);
            ColumnSpec { key, label }
        })
        .collect()
}

/// Build the render plan for a document filled with a dataset
pub fn build_page_plan<S: AsRef<str>>(
    document: &CanvasDocument,
    dataset: &Dataset,
    headings: &[S],
    footer: Option<&str>,
    options: &PlanOptions<'_>,
) -> Vec<PageRenderSpec> {
    let chunks = paginate(dataset.rows(), options.rows_per_page);
    let total_pages = chunks.len();
    tracing::debug!(pages = total_pages, rows = dataset.len(), "building page plan");
    if total_pages == 0 {
        return Vec::new();
    }

    let columns = resolve_columns(dataset, options);
    let table = document
        .widgets_of_kind(WidgetKind::DataTable)
        .next()
        .cloned();

    // stacking order is kept; tables are drawn from `table`, footers go last
    let first_page_elements: Vec<Widget> = document
        .widgets()
        .iter()
        .filter(|w| !matches!(w.kind, WidgetKind::DataTable | WidgetKind::Footer))
        .map(|w| options.populated(w))
        .collect();
    let last_page_elements: Vec<Widget> = document
        .widgets_of_kind(WidgetKind::Footer)
        .map(|w| options.populated(w))
        .collect();
    let headings: Vec<String> = headings
        .iter()
        .map(|h| options.populate(h.as_ref()))
        .collect();
    let footer = footer.map(|f| options.populate(f));

    let step = options.rows_per_page.max(1);
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, rows)| {
            let is_first = index == 0;
            let is_last = index + 1 == total_pages;

            let mut elements = Vec::new();
            if is_first {
                elements.extend(first_page_elements.iter().cloned());
            }
            if is_last {
                elements.extend(last_page_elements.iter().cloned());
            }

            PageRenderSpec {
                page_number: index + 1,
                total_pages,
                is_first,
                is_last,
                row_offset: index * step,
                columns: columns.clone(),
                rows: rows.to_vec(),
                headings: if is_first { headings.clone() } else { Vec::new() },
                footer: if is_last { footer.clone() } else { None },
                elements,
                table: table.clone(),
            }
        })
        .collect()
}
