//! Canvas file format

use canvas_model::{PageConfig, Widget};
use serde::{Deserialize, Serialize};

/// Version written into new canvas files
pub const FORMAT_VERSION: &str = "1.0";

/// File extension for exported canvas files
pub const FILE_EXTENSION: &str = "json";

/// Canonical shape of a serialized canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasFile {
    pub version: String,
    pub page_config: PageConfig,
    pub elements: Vec<Widget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}
