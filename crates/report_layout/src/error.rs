//! Error types for report layout operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
