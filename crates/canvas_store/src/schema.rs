//! Schema normalization at the loading boundary
//!
//! Stored layouts come in several historical shapes. Everything here maps them
//! onto the canonical element shape before serde sees them, so the model types
//! stay single-shaped:
//!
//! - geometry and style may be nested in `position`, `size`, `style` or
//!   `textStyle` objects;
//! - fields may use public or snake_case names (`elementType`, `content`,
//!   `prompt_text`, `src`, `left`, `font_size`, ...);
//! - numbers may be floats or `"12px"` strings, and text-valued style fields
//!   may be numbers (`fontWeight: 700`);
//! - `id`, `width` and `height` may be missing.
//!
//! A style value that cannot be coerced is dropped so its default applies;
//! the element itself survives.

use canvas_model::{snap, snap_size, WidgetId, WidgetKind};
use serde_json::{Map, Value};

/// Keys that hold the element array, in lookup order
const ELEMENT_ARRAY_KEYS: &[&str] = &["elements", "widgets", "items"];

/// Keys that hold the page block, in lookup order
const PAGE_BLOCK_KEYS: &[&str] = &["pageConfig", "page_config", "page"];

/// Nested objects whose fields are lifted to the element
const NESTED_GROUPS: &[&str] = &["position", "size", "style", "textStyle", "text_style"];

/// Alternate field name -> canonical field name
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("elementType", "type"),
    ("element_type", "type"),
    ("widgetType", "type"),
    ("kind", "type"),
    ("content", "text"),
    ("prompt_text", "text"),
    ("promptText", "text"),
    ("prompt", "text"),
    ("value", "text"),
    ("src", "imageSrc"),
    ("image_src", "imageSrc"),
    ("imageUrl", "imageSrc"),
    ("image_url", "imageSrc"),
    ("left", "x"),
    ("top", "y"),
    ("rotate", "rotation"),
    ("angle", "rotation"),
    ("color", "textColor"),
    ("fontColor", "textColor"),
    ("bgColor", "backgroundColor"),
];

/// Alternate type name -> canonical type name
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("text", "textbox"),
    ("text-box", "textbox"),
    ("rect", "rectangle"),
    ("dashed-line", "dashline"),
    ("dash-line", "dashline"),
    ("table", "data-table"),
    ("datatable", "data-table"),
    ("data_table", "data-table"),
];

/// Non-negative integer style fields that may arrive as floats or strings
const UNSIGNED_FIELDS: &[&str] = &["borderWidth", "borderRadius", "shadowBlur", "fontSize"];

/// Signed integer style fields
const SIGNED_FIELDS: &[&str] = &["shadowOffsetX", "shadowOffsetY"];

/// Percentages stored as 0-100 integers
const PERCENT_FIELDS: &[&str] = &["opacity", "filterIntensity"];

/// Fractional style fields
const FLOAT_FIELDS: &[&str] = &["lineHeight", "letterSpacing"];

/// Text-valued style fields; numbers and booleans are stringified
const STRING_FIELDS: &[&str] = &[
    "borderColor",
    "shadowColor",
    "filter",
    "objectFit",
    "alignment",
    "fontFamily",
    "fontWeight",
    "fontStyle",
    "textDecoration",
    "textColor",
    "backgroundColor",
    "textAlign",
];

/// Fields that are normalized unconditionally and always deserialize
pub(crate) const GEOMETRY_FIELDS: &[&str] = &["id", "type", "x", "y", "width", "height", "rotation"];

/// Find the element array of a canvas root
pub(crate) fn element_array(root: &Value) -> Option<&Vec<Value>> {
    match root {
        Value::Array(items) => Some(items),
        Value::Object(map) => ELEMENT_ARRAY_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

/// Find the page configuration block of a canvas root
pub(crate) fn page_block(root: &Value) -> Option<&Map<String, Value>> {
    let map = root.as_object()?;
    PAGE_BLOCK_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_object))
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Canonical name for a field, and whether the input used an alternate name
fn canonical_key(key: &str) -> (String, bool) {
    if let Some((_, canonical)) = FIELD_ALIASES.iter().find(|(alias, _)| *alias == key) {
        return ((*canonical).to_string(), true);
    }
    if key.contains('_') {
        return (snake_to_camel(key), true);
    }
    (key.to_string(), false)
}

/// Canonical widget type name, if the input names a known type
fn canonical_type(name: &str) -> Option<&'static str> {
    let lowered = name.trim().to_ascii_lowercase();
    let resolved = TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(lowered.as_str());
    resolved.parse::<WidgetKind>().ok().map(|kind| kind.as_str())
}

/// Read a number from a JSON number or a numeric string (`"12"`, `"12px"`)
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches("px").trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn set_int(fields: &mut Map<String, Value>, key: &str, value: i64) {
    fields.insert(key.to_string(), Value::from(value));
}

/// Rewrite a numeric field in place, or drop it when it is not a number
fn coerce_number(fields: &mut Map<String, Value>, key: &str, convert: impl Fn(f64) -> Value) {
    if let Some(number) = fields.get(key).map(as_number) {
        match number {
            Some(n) => {
                fields.insert(key.to_string(), convert(n));
            }
            None => {
                fields.remove(key);
            }
        }
    }
}

fn clamped_int(n: f64, min: f64, max: f64) -> Value {
    Value::from(n.round().clamp(min, max) as i64)
}

/// Why an element could not be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ElementIssue {
    NotAnObject,
    MissingType,
    UnknownType(String),
}

impl std::fmt::Display for ElementIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementIssue::NotAnObject => write!(f, "element is not an object"),
            ElementIssue::MissingType => write!(f, "element has no type"),
            ElementIssue::UnknownType(t) => write!(f, "unknown element type '{}'", t),
        }
    }
}

/// Normalized element fields plus whether any alternate names were used
pub(crate) struct NormalizedElement {
    pub fields: Map<String, Value>,
    pub used_aliases: bool,
}

/// Map one raw element onto the canonical field set
pub(crate) fn normalize_element(raw: &Value) -> Result<NormalizedElement, ElementIssue> {
    let raw = raw.as_object().ok_or(ElementIssue::NotAnObject)?;

    // nested groups first so top-level fields override them
    let mut entries: Vec<(&String, &Value)> = Vec::new();
    for group in NESTED_GROUPS {
        if let Some(Value::Object(inner)) = raw.get(*group) {
            entries.extend(inner.iter());
        }
    }
    entries.extend(
        raw.iter()
            .filter(|(key, value)| !(NESTED_GROUPS.contains(&key.as_str()) && value.is_object())),
    );

    let mut fields = Map::new();
    let mut aliased = Vec::new();
    for (key, value) in entries {
        let (canonical, is_alias) = canonical_key(key);
        if is_alias {
            aliased.push((canonical, value));
        } else {
            fields.insert(canonical, value.clone());
        }
    }
    let used_aliases = !aliased.is_empty();
    for (canonical, value) in aliased {
        // a canonical name always beats an alternate one
        if !fields.contains_key(&canonical) {
            fields.insert(canonical, value.clone());
        }
    }

    let type_name = fields
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ElementIssue::MissingType)?
        .to_string();
    let kind_name = canonical_type(&type_name).ok_or(ElementIssue::UnknownType(type_name))?;
    fields.insert("type".to_string(), Value::from(kind_name));
    let kind: WidgetKind = kind_name
        .parse()
        .map_err(|_| ElementIssue::UnknownType(kind_name.to_string()))?;

    match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => {}
        Some(Value::Number(n)) => {
            let id = n.to_string();
            fields.insert("id".to_string(), Value::from(id));
        }
        _ => {
            fields.insert("id".to_string(), Value::from(WidgetId::new().to_string()));
        }
    }

    let (default_width, default_height) = kind.default_size();
    for (key, fallback) in [("x", 0.0), ("y", 0.0)] {
        let value = fields.get(key).and_then(as_number).unwrap_or(fallback);
        set_int(&mut fields, key, i64::from(snap(value)));
    }
    for (key, fallback) in [("width", default_width), ("height", default_height)] {
        let value = fields
            .get(key)
            .and_then(as_number)
            .unwrap_or(f64::from(fallback));
        set_int(&mut fields, key, i64::from(snap_size(value)));
    }

    let rotation = fields.get("rotation").and_then(as_number).unwrap_or(0.0);
    fields.insert(
        "rotation".to_string(),
        clamped_int(rotation, f64::from(i32::MIN), f64::from(i32::MAX)),
    );

    for key in UNSIGNED_FIELDS {
        coerce_number(&mut fields, key, |n| clamped_int(n, 0.0, f64::from(u32::MAX)));
    }
    for key in SIGNED_FIELDS {
        coerce_number(&mut fields, key, |n| {
            clamped_int(n, f64::from(i32::MIN), f64::from(i32::MAX))
        });
    }
    for key in PERCENT_FIELDS {
        coerce_number(&mut fields, key, |n| clamped_int(n, 0.0, 100.0));
    }
    for key in FLOAT_FIELDS {
        coerce_number(&mut fields, key, |n| {
            let n = n.clamp(f64::from(f32::MIN), f64::from(f32::MAX));
            serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
        });
    }
    for key in STRING_FIELDS {
        match fields.get(*key) {
            Some(Value::String(_)) | None => {}
            Some(Value::Number(n)) => {
                let text = n.to_string();
                fields.insert((*key).to_string(), Value::from(text));
            }
            Some(Value::Bool(b)) => {
                let text = b.to_string();
                fields.insert((*key).to_string(), Value::from(text));
            }
            Some(_) => {
                fields.remove(*key);
            }
        }
    }
    if let Some(Value::String(shadow)) = fields.get("shadow") {
        let lowered = shadow.trim().to_ascii_lowercase();
        fields.insert("shadow".to_string(), Value::from(lowered));
    }

    if fields.get("text").is_some_and(|t| !t.is_string()) {
        let text = match fields.get("text") {
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        fields.insert("text".to_string(), Value::from(text));
    }
    if fields.get("imageSrc").is_some_and(|src| src.as_str() == Some("")) {
        fields.insert("imageSrc".to_string(), Value::Null);
    }

    Ok(NormalizedElement {
        fields,
        used_aliases,
    })
}
