//! Canvas serialization
//!
//! `serialize` always writes the canonical [`CanvasFile`] shape. `deserialize`
//! accepts the canonical shape and every historical variant handled by the
//! schema normalizer; it only fails when the text is not JSON at all or has no
//! element array.

use crate::legacy::unwrap_quoted;
use crate::schema::{element_array, normalize_element, page_block, GEOMETRY_FIELDS};
use crate::{CanvasFile, CanvasSummary, Result, StoreError, FORMAT_VERSION};
use canvas_model::{
    find_page_preset, CanvasDocument, PageConfig, PageDimension, Widget, CUSTOM_PAGE_KEY,
    FREE_PAGE_KEY,
};
use serde_json::{Map, Value};

/// Options controlling how a canvas is written
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeOptions {
    pub page_key: String,
    pub page_width: PageDimension,
    pub page_height: PageDimension,
    pub page_label: String,
    /// Indent the output; no other effect
    pub pretty: bool,
    /// Value written to the `version` field
    pub format_version: String,
    /// Extra metadata merged over the derived element counts
    pub metadata: Map<String, Value>,
}

impl SerializeOptions {
    /// Options taking the page block from a document's page configuration
    pub fn for_document(document: &CanvasDocument) -> Self {
        Self::from_page(document.page())
    }

    pub fn from_page(page: &PageConfig) -> Self {
        Self {
            page_key: page.key.clone(),
            page_width: page.width,
            page_height: page.height,
            page_label: page.label.clone(),
            pretty: true,
            format_version: FORMAT_VERSION.to_string(),
            metadata: Map::new(),
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_format_version(mut self, version: impl Into<String>) -> Self {
        self.format_version = version.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merge several metadata entries at once
    pub fn with_metadata_map(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata.extend(metadata);
        self
    }

    fn page_config(&self) -> PageConfig {
        PageConfig::custom(
            self.page_key.clone(),
            self.page_width,
            self.page_height,
            self.page_label.clone(),
        )
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self::from_page(&PageConfig::default())
    }
}

/// Result of loading a canvas
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCanvas {
    /// Version string of the file, if it had one
    pub version: Option<String>,
    /// Widgets in stored order
    pub elements: Vec<Widget>,
    /// Page configuration, if the file had a page block
    pub page_config: Option<PageConfig>,
    /// Free-form metadata block, passed through unchanged
    pub metadata: Option<Value>,
    pub total_elements: usize,
    /// Elements dropped because they had no usable type
    pub skipped_elements: usize,
}

impl LoadedCanvas {
    /// Build an editable document; a missing page block means `free`
    pub fn into_document(self) -> CanvasDocument {
        self.into_document_or(PageConfig::default())
    }

    /// Build an editable document, using `fallback` when the file had no page block
    pub fn into_document_or(self, fallback: PageConfig) -> CanvasDocument {
        CanvasDocument::from_widgets(self.elements, self.page_config.unwrap_or(fallback))
    }

    /// Metadata entries worth carrying into a rewritten file.
    ///
    /// Keys derived from the elements and page are left out; they are
    /// recomputed on serialize.
    pub fn carried_metadata(&self) -> Map<String, Value> {
        let derived = CanvasSummary::new(&[], &PageConfig::default()).to_metadata();
        match &self.metadata {
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(key, _)| !derived.contains_key(key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => Map::new(),
        }
    }

    pub fn summary(&self) -> CanvasSummary {
        CanvasSummary::new(&self.elements, self.page_config.as_ref().unwrap_or(&PageConfig::default()))
    }
}

/// Serialize widgets with the page block and metadata taken from `options`
pub fn serialize_widgets(widgets: &[Widget], options: &SerializeOptions) -> Result<String> {
    let page_config = options.page_config();
    let mut metadata = CanvasSummary::new(widgets, &page_config).to_metadata();
    for (key, value) in &options.metadata {
        metadata.insert(key.clone(), value.clone());
    }

    let file = CanvasFile {
        version: options.format_version.clone(),
        page_config,
        elements: widgets.to_vec(),
        metadata: Some(Value::Object(metadata)),
    };

    let json = if options.pretty {
        serde_json::to_string_pretty(&file)?
    } else {
        serde_json::to_string(&file)?
    };
    Ok(json)
}

/// Serialize a document
pub fn serialize(document: &CanvasDocument, options: &SerializeOptions) -> Result<String> {
    serialize_widgets(document.widgets(), options)
}

/// Parse canvas text in any supported shape
pub fn deserialize(raw: &str) -> Result<LoadedCanvas> {
    let text = unwrap_quoted(raw);
    let root: Value = serde_json::from_str(&text)
        .map_err(|e| StoreError::Malformed(format!("canvas is not valid JSON: {}", e)))?;

    let raw_elements = element_array(&root)
        .ok_or_else(|| StoreError::Malformed("canvas has no element array".to_string()))?;

    let mut elements = Vec::with_capacity(raw_elements.len());
    let mut skipped_elements = 0;
    for (index, raw_element) in raw_elements.iter().enumerate() {
        match parse_element(raw_element) {
            Ok(widget) => elements.push(widget),
            Err(reason) => {
                tracing::warn!(index, %reason, "skipping canvas element");
                skipped_elements += 1;
            }
        }
    }

    let version = root.get("version").and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Ok(LoadedCanvas {
        version,
        total_elements: elements.len(),
        elements,
        page_config: page_block(&root).map(parse_page_config),
        metadata: root.get("metadata").cloned(),
        skipped_elements,
    })
}

/// Load straight into an editable document
pub fn load_document(raw: &str) -> Result<CanvasDocument> {
    Ok(deserialize(raw)?.into_document())
}

fn parse_element(raw: &Value) -> std::result::Result<Widget, String> {
    let normalized = normalize_element(raw).map_err(|issue| issue.to_string())?;
    if normalized.used_aliases {
        tracing::debug!("element uses alternate field names");
    }
    let fields = normalized.fields;
    match serde_json::from_value(Value::Object(fields.clone())) {
        Ok(widget) => Ok(widget),
        Err(e) => {
            tracing::debug!(error = %e, "element has unreadable fields, retrying field by field");
            serde_json::from_value(Value::Object(readable_fields(fields)))
                .map_err(|e| e.to_string())
        }
    }
}

/// Keep the geometry plus every other field that deserializes on its own;
/// dropped fields fall back to their defaults
fn readable_fields(fields: Map<String, Value>) -> Map<String, Value> {
    let mut kept = Map::new();
    let mut optional = Vec::new();
    for (key, value) in fields {
        if GEOMETRY_FIELDS.contains(&key.as_str()) {
            kept.insert(key, value);
        } else {
            optional.push((key, value));
        }
    }
    for (key, value) in optional {
        let mut candidate = kept.clone();
        candidate.insert(key.clone(), value.clone());
        if serde_json::from_value::<Widget>(Value::Object(candidate)).is_ok() {
            kept.insert(key, value);
        } else {
            tracing::warn!(field = %key, "dropping unreadable element field");
        }
    }
    kept
}

/// Page key of a preset is trusted for dimensions; any other key carries its
/// literal width and height as a custom size
fn parse_page_config(block: &Map<String, Value>) -> PageConfig {
    let key = ["key", "pageKey", "preset"]
        .iter()
        .find_map(|k| block.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|k| !k.is_empty());
    let label = block
        .get("label")
        .and_then(Value::as_str)
        .filter(|l| !l.is_empty());
    let dimension = |name: &str| {
        block
            .get(name)
            .and_then(|v| serde_json::from_value::<PageDimension>(v.clone()).ok())
            .unwrap_or_default()
    };

    if let Some(preset) = key.and_then(find_page_preset) {
        let mut config = PageConfig::from_preset(preset.key);
        if let Some(label) = label {
            config.label = label.to_string();
        }
        return config;
    }

    let width = dimension("width");
    let height = dimension("height");
    match key {
        None if width.is_auto() && height.is_auto() => PageConfig::from_preset(FREE_PAGE_KEY),
        _ => {
            let key = key.unwrap_or(CUSTOM_PAGE_KEY);
            tracing::warn!(key, %width, %height, "page key is not a preset, using custom size");
            PageConfig::custom(key, width, height, label.unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_model::{PageSize, WidgetKind};
    use serde_json::json;

    const PAGE: PageSize = PageSize::new(800, 600);

    fn sample_document() -> CanvasDocument {
        let mut doc = CanvasDocument::with_page(PageConfig::from_preset("a4-portrait"));
        doc.add_widget(Widget::create(WidgetKind::Header, 0.0, 0.0, PAGE));
        let mut text = Widget::create(WidgetKind::TextBox, 40.0, 80.0, PAGE);
        text.text = "Branch {branch.name} on {date}".to_string();
        doc.add_widget(text);
        doc.add_widget(Widget::create(WidgetKind::DataTable, 0.0, 0.0, PAGE));
        doc
    }

    #[test]
    fn test_round_trip() {
        let doc = sample_document();
        let json = serialize(&doc, &SerializeOptions::for_document(&doc)).unwrap();
        let loaded = deserialize(&json).unwrap();

        assert_eq!(loaded.elements, doc.widgets());
        assert_eq!(loaded.total_elements, 3);
        assert_eq!(loaded.skipped_elements, 0);
        assert_eq!(loaded.version.as_deref(), Some(FORMAT_VERSION));
        assert_eq!(loaded.page_config.as_ref(), Some(doc.page()));
    }

    #[test]
    fn test_pretty_flag_only_changes_whitespace() {
        let doc = sample_document();
        let options = SerializeOptions::for_document(&doc);
        let pretty = serialize(&doc, &options).unwrap();
        let compact = serialize(&doc, &options.clone().with_pretty(false)).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
        assert_eq!(deserialize(&pretty).unwrap(), deserialize(&compact).unwrap());
    }

    #[test]
    fn test_metadata_is_derived_and_merged() {
        let doc = sample_document();
        let options = SerializeOptions::for_document(&doc).with_metadata("reportId", 42);
        let loaded = deserialize(&serialize(&doc, &options).unwrap()).unwrap();
        let metadata = loaded.metadata.unwrap();
        assert_eq!(metadata["elementCount"], 3);
        assert_eq!(metadata["elementTypes"]["data-table"], 1);
        assert_eq!(metadata["pageKey"], "a4-portrait");
        assert_eq!(metadata["reportId"], 42);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = deserialize("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
        assert!(err.to_string().contains("not valid JSON"));

        assert!(matches!(deserialize("{\"version\":\"1.0\"}"), Err(StoreError::Malformed(_))));
        assert!(matches!(deserialize(""), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_quote_wrapped_input() {
        let doc = sample_document();
        let json = serialize(&doc, &SerializeOptions::for_document(&doc).with_pretty(false)).unwrap();
        let wrapped = format!("\"{}\"", json.replace('"', "\\\""));
        assert_eq!(deserialize(&wrapped).unwrap(), deserialize(&json).unwrap());
    }

    #[test]
    fn test_odd_style_values_keep_the_element() {
        let raw = json!({
            "elements": [
                {"type": "textbox", "id": "bold", "fontWeight": 700},
                {"type": "rectangle", "id": "border", "borderWidth": -1},
                {"type": "textbox", "id": "spaced", "lineHeight": "1.5"},
                {"type": "image", "id": "odd", "shadow": "glow", "imageSrc": 5, "responsive": "yes"}
            ]
        });
        let loaded = deserialize(&raw.to_string()).unwrap();
        assert_eq!((loaded.total_elements, loaded.skipped_elements), (4, 0));
        assert_eq!(loaded.elements[0].text_style.font_weight, "700");
        assert_eq!(loaded.elements[1].style.border_width, 0);
        assert_eq!(loaded.elements[2].text_style.line_height, 1.5);

        let odd = &loaded.elements[3];
        assert_eq!(odd.id.as_str(), "odd");
        assert_eq!(odd.style.shadow, canvas_model::ShadowPreset::None);
        assert_eq!(odd.image_src, None);
        assert_eq!(odd.responsive, canvas_model::Responsive::default());
    }

    #[test]
    fn test_extreme_coordinates_load_clamped() {
        let raw = json!({"elements": [{"type": "textbox", "id": "a", "x": 1e12, "y": 0}]});
        let loaded = deserialize(&raw.to_string()).unwrap();
        assert_eq!(loaded.skipped_elements, 0);
        let widget = &loaded.elements[0];
        assert_eq!(widget.x, canvas_model::MAX_COORDINATE);
        assert!(widget.is_grid_aligned());
    }

    #[test]
    fn test_format_version_option() {
        let doc = sample_document();
        let options = SerializeOptions::for_document(&doc).with_format_version("1.1");
        let loaded = deserialize(&serialize(&doc, &options).unwrap()).unwrap();
        assert_eq!(loaded.version.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_carried_metadata_skips_derived_keys() {
        let raw = json!({
            "elements": [{"type": "line"}],
            "metadata": {"reportId": "R-7", "elementCount": 99, "pageKey": "a4l"}
        });
        let loaded = deserialize(&raw.to_string()).unwrap();
        let carried = loaded.carried_metadata();
        assert_eq!(carried.len(), 1);
        assert_eq!(carried["reportId"], "R-7");

        let document = loaded.into_document_or(PageConfig::from_preset("letterp"));
        assert_eq!(document.page().key, "letterp");
        let options = SerializeOptions::for_document(&document).with_metadata_map(carried);
        let rewritten = deserialize(&serialize(&document, &options).unwrap()).unwrap();
        let metadata = rewritten.metadata.unwrap();
        assert_eq!(metadata["reportId"], "R-7");
        assert_eq!(metadata["elementCount"], 1);
        assert_eq!(metadata["pageKey"], "letterp");
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let raw = json!({
            "elements": [
                {"type": "textbox", "id": "a", "x": 10, "y": 10, "width": 200, "height": 40},
                {"type": "chart", "id": "b"},
                "garbage",
                {"type": "image", "id": "c"}
            ]
        });
        let loaded = deserialize(&raw.to_string()).unwrap();
        assert_eq!(loaded.total_elements, 2);
        assert_eq!(loaded.skipped_elements, 2);
        assert_eq!(loaded.elements[1].id.as_str(), "c");
        assert_eq!((loaded.elements[1].width, loaded.elements[1].height), (160, 100));
        assert!(loaded.page_config.is_none());
        assert_eq!(loaded.into_document().page().key, "free");
    }

    #[test]
    fn test_public_schema_document() {
        let raw = json!({
            "version": 2,
            "page_config": {"key": "letterl", "width": 1, "height": 1},
            "widgets": [{
                "id": "w1",
                "elementType": "image",
                "position": {"x": 100, "y": 200},
                "size": {"width": 300, "height": 150},
                "src": "https://example.com/logo.png",
                "style": {"border_radius": 4, "object_fit": "contain"}
            }]
        });
        let loaded = deserialize(&raw.to_string()).unwrap();
        assert_eq!(loaded.version.as_deref(), Some("2"));
        let page = loaded.page_config.clone().unwrap();
        assert_eq!(page.width, PageDimension::Px(1056));
        assert_eq!(page.label, "Letter Landscape");

        let image = &loaded.elements[0];
        assert_eq!(image.kind, WidgetKind::Image);
        assert_eq!((image.x, image.y, image.width, image.height), (100, 200, 300, 150));
        assert_eq!(image.image_src.as_deref(), Some("https://example.com/logo.png"));
        assert_eq!(image.style.border_radius, 4);
        assert_eq!(image.style.object_fit, "contain");
    }

    #[test]
    fn test_custom_page_size_carried_through() {
        let raw = json!({
            "pageConfig": {"key": "poster", "width": 700, "height": "900", "label": "Poster"},
            "elements": []
        });
        let page = deserialize(&raw.to_string()).unwrap().page_config.unwrap();
        assert!(!page.is_preset());
        assert_eq!(page.key, "poster");
        assert_eq!(page.effective_size(PageSize::new(1, 1)), PageSize::new(700, 900));
        assert_eq!(page.label, "Poster");
    }

    #[test]
    fn test_page_block_without_key() {
        let sized = json!({"page": {"width": 640, "height": 480}, "elements": []});
        let page = deserialize(&sized.to_string()).unwrap().page_config.unwrap();
        assert_eq!(page.key, CUSTOM_PAGE_KEY);

        let empty = json!({"page": {}, "elements": []});
        let page = deserialize(&empty.to_string()).unwrap().page_config.unwrap();
        assert_eq!(page, PageConfig::default());
    }

    #[test]
    fn test_bare_element_array() {
        let raw = json!([{"type": "footer", "text": "Page {page}"}]);
        let loaded = deserialize(&raw.to_string()).unwrap();
        assert_eq!(loaded.total_elements, 1);
        assert_eq!(loaded.elements[0].text, "Page {page}");
        assert!(loaded.metadata.is_none());
    }
}
