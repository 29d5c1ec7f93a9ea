//! Tabular report data
//!
//! A [`Dataset`] is the column list and row list returned by the backend for
//! a report, after the viewer's filter and sort steps. Rows are JSON objects
//! keyed by column name; key order is kept so the first row can define the
//! table's column order.

use crate::{LayoutError, Result};
use placeholders::render_value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::str::FromStr;

/// One data record
pub type Row = Map<String, Value>;

/// Table data as delivered by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl From<TableData> for Dataset {
    fn from(data: TableData) -> Self {
        Dataset::new(data.columns, data.rows)
    }
}

/// Column keys in the order they appear in the first row
pub fn columns_from_first_row(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

// =============================================================================
// Filtering and sorting
// =============================================================================

/// Comparison applied by a column filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }

    /// Whether the operator ignores its right-hand value
    pub fn is_unary(&self) -> bool {
        matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }

    /// Compare a cell's text with a filter value; numeric when both parse
    pub fn evaluate(&self, left: &str, right: &str) -> bool {
        match self {
            Self::Equal => compare_values(left, right) == Ordering::Equal,
            Self::NotEqual => compare_values(left, right) != Ordering::Equal,
            Self::LessThan => compare_values(left, right) == Ordering::Less,
            Self::LessThanOrEqual => compare_values(left, right) != Ordering::Greater,
            Self::GreaterThan => compare_values(left, right) == Ordering::Greater,
            Self::GreaterThanOrEqual => compare_values(left, right) != Ordering::Less,
            Self::Contains => left.contains(right),
            Self::NotContains => !left.contains(right),
            Self::StartsWith => left.starts_with(right),
            Self::EndsWith => left.ends_with(right),
            Self::IsEmpty => left.trim().is_empty(),
            Self::IsNotEmpty => !left.trim().is_empty(),
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "==" | "=" | "equal" => Ok(Self::Equal),
            "!=" | "<>" | "not_equal" => Ok(Self::NotEqual),
            "<" | "less_than" => Ok(Self::LessThan),
            "<=" | "less_than_or_equal" => Ok(Self::LessThanOrEqual),
            ">" | "greater_than" => Ok(Self::GreaterThan),
            ">=" | "greater_than_or_equal" => Ok(Self::GreaterThanOrEqual),
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            "starts_with" => Ok(Self::StartsWith),
            "ends_with" => Ok(Self::EndsWith),
            "is_empty" => Ok(Self::IsEmpty),
            "is_not_empty" => Ok(Self::IsNotEmpty),
            other => Err(LayoutError::InvalidDataset(format!(
                "unknown comparison operator '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compare_values(left: &str, right: &str) -> Ordering {
    if let (Ok(l), Ok(r)) = (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        return l.partial_cmp(&r).unwrap_or(Ordering::Equal);
    }
    left.cmp(right)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

// =============================================================================
// Dataset
// =============================================================================

/// Columns and rows of a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset. Declared columns missing from the list but present
    /// in the first row are appended.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut columns = columns;
        for key in columns_from_first_row(&rows) {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
        Self { columns, rows }
    }

    /// Dataset whose columns come from the first row
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(Vec::new(), rows)
    }

    /// Parse a dataset from JSON: either an array of row objects, or an
    /// object with a `rows` (or `data`) array and optional `columns`.
    pub fn from_json(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self> {
        match root {
            Value::Array(items) => Ok(Self::from_rows(rows_from_values(items)?)),
            Value::Object(mut map) => {
                let rows = match map.remove("rows").or_else(|| map.remove("data")) {
                    Some(Value::Array(items)) => rows_from_values(items)?,
                    Some(_) => {
                        return Err(LayoutError::InvalidDataset(
                            "rows must be an array".to_string(),
                        ))
                    }
                    None => Vec::new(),
                };
                let columns = match map.remove("columns") {
                    Some(value) => serde_json::from_value::<Vec<String>>(value).map_err(|e| {
                        LayoutError::InvalidDataset(format!("columns must be strings: {}", e))
                    })?,
                    None => Vec::new(),
                };
                Ok(Self::new(columns, rows))
            }
            _ => Err(LayoutError::InvalidDataset(
                "expected an array of rows or an object with rows".to_string(),
            )),
        }
    }

    /// Declared column list
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns a rendered table shows: the first row's keys, or the declared
    /// columns when there are no rows
    pub fn resolved_columns(&self) -> Vec<String> {
        if self.rows.is_empty() {
            self.columns.clone()
        } else {
            columns_from_first_row(&self.rows)
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column) || self.rows.iter().any(|r| r.contains_key(column))
    }

    /// Display text of one cell; missing and null cells are empty
    pub fn cell_text(row: &Row, column: &str) -> String {
        row.get(column).map(render_value).unwrap_or_default()
    }

    fn require_column(&self, column: &str) -> Result<()> {
        let shapeless = self.columns.is_empty() && self.rows.is_empty();
        if shapeless || self.has_column(column) {
            Ok(())
        } else {
            Err(LayoutError::ColumnNotFound(column.to_string()))
        }
    }

    /// Rows whose `column` satisfies `operator` against `value`
    pub fn filter(&self, column: &str, operator: ComparisonOperator, value: &str) -> Result<Dataset> {
        self.require_column(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| operator.evaluate(&Self::cell_text(row, column), value))
            .cloned()
            .collect();
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Stable sort by one column; numeric when both cells parse as numbers
    pub fn sort_by(&mut self, column: &str, order: SortOrder) -> Result<()> {
        self.require_column(column)?;
        self.rows.sort_by(|a, b| {
            let ordering = compare_values(&Self::cell_text(a, column), &Self::cell_text(b, column));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        Ok(())
    }

    /// Distinct non-empty values of a column in first-seen order
    pub fn distinct_values(&self, column: &str) -> Result<Vec<String>> {
        self.require_column(column)?;
        let mut values: Vec<String> = Vec::new();
        for row in &self.rows {
            let text = Self::cell_text(row, column);
            if !text.is_empty() && !values.contains(&text) {
                values.push(text);
            }
        }
        Ok(values)
    }
}

fn rows_from_values(items: Vec<Value>) -> Result<Vec<Row>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(row) => Ok(row),
            _ => Err(LayoutError::InvalidDataset(format!(
                "row {} is not an object",
                index
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sales() -> Dataset {
        Dataset::from_json(
            r#"[
                {"branch": "Kandy", "amount": 120, "region": "Central"},
                {"branch": "Galle", "amount": 75.5, "region": "Southern"},
                {"branch": "Colombo", "amount": 980, "region": "Western"},
                {"branch": "Matara", "amount": null, "region": "Southern"}
            ]"#,
        )
        .unwrap()
    }

    fn branches(data: &Dataset) -> Vec<String> {
        data.rows().iter().map(|r| Dataset::cell_text(r, "branch")).collect()
    }

    #[test]
    fn test_columns_follow_first_row_order() {
        let data = sales();
        assert_eq!(data.resolved_columns(), vec!["branch", "amount", "region"]);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_object_form_with_declared_columns() {
        let data = Dataset::from_json(
            r#"{"columns": ["id", "name"], "rows": [{"name": "x", "id": 1, "extra": true}]}"#,
        )
        .unwrap();
        assert_eq!(data.columns(), &["id", "name", "extra"]);
        assert_eq!(data.resolved_columns(), vec!["name", "id", "extra"]);

        let empty = Dataset::from_json(r#"{"columns": ["id"]}"#).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.resolved_columns(), vec!["id"]);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(Dataset::from_json("[1, 2]"), Err(LayoutError::InvalidDataset(_))));
        assert!(matches!(Dataset::from_json("\"rows\""), Err(LayoutError::InvalidDataset(_))));
        assert!(matches!(Dataset::from_json("{\"rows\": 3}"), Err(LayoutError::InvalidDataset(_))));
        assert!(matches!(Dataset::from_json("{"), Err(LayoutError::Json(_))));
    }

    #[test]
    fn test_numeric_filter() {
        let data = sales();
        let big = data.filter("amount", ComparisonOperator::GreaterThan, "100").unwrap();
        assert_eq!(branches(&big), vec!["Kandy", "Colombo"]);

        let exact = data.filter("amount", ComparisonOperator::Equal, "75.50").unwrap();
        assert_eq!(branches(&exact), vec!["Galle"]);
    }

    #[test]
    fn test_text_filters() {
        let data = sales();
        let southern = data.filter("region", "==".parse().unwrap(), "Southern").unwrap();
        assert_eq!(branches(&southern), vec!["Galle", "Matara"]);

        let starts = data.filter("branch", ComparisonOperator::StartsWith, "Ma").unwrap();
        assert_eq!(branches(&starts), vec!["Matara"]);

        let missing = data.filter("amount", ComparisonOperator::IsEmpty, "").unwrap();
        assert_eq!(branches(&missing), vec!["Matara"]);
    }

    #[test]
    fn test_filter_unknown_column() {
        let data = sales();
        assert!(matches!(
            data.filter("profit", ComparisonOperator::Equal, "1"),
            Err(LayoutError::ColumnNotFound(c)) if c == "profit"
        ));
        assert!(Dataset::default().filter("profit", ComparisonOperator::Equal, "1").is_ok());
    }

    #[test]
    fn test_sort_numeric_and_text() {
        let mut data = sales();
        data.sort_by("amount", SortOrder::Descending).unwrap();
        assert_eq!(branches(&data), vec!["Colombo", "Kandy", "Galle", "Matara"]);

        data.sort_by("branch", SortOrder::Ascending).unwrap();
        assert_eq!(branches(&data), vec!["Colombo", "Galle", "Kandy", "Matara"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut data = sales();
        data.sort_by("region", SortOrder::Ascending).unwrap();
        assert_eq!(branches(&data), vec!["Kandy", "Galle", "Matara", "Colombo"]);
    }

    #[test]
    fn test_distinct_values() {
        let data = sales();
        assert_eq!(data.distinct_values("region").unwrap(), vec!["Central", "Southern", "Western"]);
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("<=".parse::<ComparisonOperator>().unwrap(), ComparisonOperator::LessThanOrEqual);
        assert_eq!("is_not_empty".parse::<ComparisonOperator>().unwrap(), ComparisonOperator::IsNotEmpty);
        assert!("~".parse::<ComparisonOperator>().is_err());
        assert!(ComparisonOperator::IsEmpty.is_unary());
        assert_eq!(ComparisonOperator::GreaterThan.to_string(), ">");
    }

    #[test]
    fn test_table_data_conversion() {
        let data: TableData = serde_json::from_value(json!({
            "columns": ["a"],
            "rows": [{"a": 1, "b": 2}]
        }))
        .unwrap();
        let dataset = Dataset::from(data);
        assert_eq!(dataset.columns(), &["a", "b"]);
    }
}
