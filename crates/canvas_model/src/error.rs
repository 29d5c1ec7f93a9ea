//! Error types for canvas model operations

use crate::WidgetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Widget not found: {0}")]
    WidgetNotFound(WidgetId),

    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(String),

    #[error("Invalid resize direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid alignment: {0}")]
    InvalidAlignment(String),

    #[error("Invalid value for property '{key}': {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("Property cannot be changed: {0}")]
    ImmutableField(String),

    #[error("No drag in progress")]
    NoActiveDrag,
}

pub type Result<T> = std::result::Result<T, CanvasError>;
