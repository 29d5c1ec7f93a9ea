//! Widget types for report canvas elements
//!
//! A widget is one positioned, styled element on a report page: a text box,
//! shape, image, data-table placeholder, header or footer. Widgets are plain
//! values; every geometry operation returns a new widget whose position and
//! size sit on the grid.

use crate::grid::round_half_up;
use crate::{snap, snap_size, is_grid_aligned, CanvasError, PageSize, ResizeDirection, Result, WidgetId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Widget Kind
// =============================================================================

/// The closed set of widget types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WidgetKind {
    #[serde(rename = "textbox")]
    TextBox,
    #[serde(rename = "rectangle")]
    Rectangle,
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "dashline")]
    DashLine,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "data-table")]
    DataTable,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "footer")]
    Footer,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 8] = [
        WidgetKind::TextBox,
        WidgetKind::Rectangle,
        WidgetKind::Line,
        WidgetKind::DashLine,
        WidgetKind::Image,
        WidgetKind::DataTable,
        WidgetKind::Header,
        WidgetKind::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::TextBox => "textbox",
            WidgetKind::Rectangle => "rectangle",
            WidgetKind::Line => "line",
            WidgetKind::DashLine => "dashline",
            WidgetKind::Image => "image",
            WidgetKind::DataTable => "data-table",
            WidgetKind::Header => "header",
            WidgetKind::Footer => "footer",
        }
    }

    /// Nominal size of a freshly dropped widget, before grid snapping
    pub fn default_size(&self) -> (i32, i32) {
        match self {
            WidgetKind::Line => (120, 2),
            WidgetKind::TextBox | WidgetKind::Header | WidgetKind::Footer => (200, 40),
            WidgetKind::DataTable => (200, 65),
            WidgetKind::Rectangle | WidgetKind::Image | WidgetKind::DashLine => (160, 100),
        }
    }

    /// Whether the widget carries editable text content
    pub fn has_text(&self) -> bool {
        matches!(self, WidgetKind::TextBox | WidgetKind::Header | WidgetKind::Footer)
    }
}

impl FromStr for WidgetKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        WidgetKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CanvasError::UnknownWidgetType(s.to_string()))
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Styles
// =============================================================================

/// Drop shadow preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowPreset {
    #[default]
    None,
    Small,
    Medium,
    Large,
    Custom,
}

/// A resolved drop shadow for renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowSpec {
    pub color: String,
    pub blur: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Box styling shared by every widget type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetStyle {
    /// Opacity in percent (0-100)
    pub opacity: u8,
    pub border_width: u32,
    pub border_color: String,
    pub border_radius: u32,
    pub shadow: ShadowPreset,
    /// Only used when `shadow` is `custom`
    pub shadow_color: String,
    pub shadow_blur: u32,
    pub shadow_offset_x: i32,
    pub shadow_offset_y: i32,
    /// Image filter name (`none`, `grayscale`, `sepia`, `blur`, ...)
    pub filter: String,
    pub filter_intensity: u8,
    pub object_fit: String,
    pub alignment: String,
}

impl Default for WidgetStyle {
    fn default() -> Self {
        Self {
            opacity: 100,
            border_width: 0,
            border_color: "#000000".to_string(),
            border_radius: 0,
            shadow: ShadowPreset::None,
            shadow_color: "#000000".to_string(),
            shadow_blur: 0,
            shadow_offset_x: 0,
            shadow_offset_y: 0,
            filter: "none".to_string(),
            filter_intensity: 100,
            object_fit: "cover".to_string(),
            alignment: "left".to_string(),
        }
    }
}

impl WidgetStyle {
    /// Resolve the shadow preset into concrete parameters
    pub fn shadow_spec(&self) -> Option<ShadowSpec> {
        let preset = |blur, offset_y, alpha: &str| ShadowSpec {
            color: format!("rgba(0, 0, 0, {})", alpha),
            blur,
            offset_x: 0,
            offset_y,
        };
        match self.shadow {
            ShadowPreset::None => None,
            ShadowPreset::Small => Some(preset(3, 1, "0.12")),
            ShadowPreset::Medium => Some(preset(6, 4, "0.16")),
            ShadowPreset::Large => Some(preset(15, 10, "0.2")),
            ShadowPreset::Custom => Some(ShadowSpec {
                color: self.shadow_color.clone(),
                blur: self.shadow_blur,
                offset_x: self.shadow_offset_x,
                offset_y: self.shadow_offset_y,
            }),
        }
    }

    /// Opacity as a 0.0-1.0 factor
    pub fn opacity_factor(&self) -> f32 {
        f32::from(self.opacity.min(100)) / 100.0
    }
}

/// Text styling for text-bearing widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    pub text_color: String,
    pub background_color: String,
    pub text_align: String,
    pub line_height: f32,
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 16,
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            text_decoration: "none".to_string(),
            text_color: "#000000".to_string(),
            background_color: "transparent".to_string(),
            text_align: "left".to_string(),
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

/// Visibility hints per device class; passed through, never enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Responsive {
    pub desktop: bool,
    pub tablet: bool,
    pub mobile: bool,
}

impl Default for Responsive {
    fn default() -> Self {
        Self {
            desktop: true,
            tablet: true,
            mobile: true,
        }
    }
}

// =============================================================================
// Widget
// =============================================================================

/// Default content of a new text box
pub const DEFAULT_TEXTBOX_TEXT: &str = "Text";

/// One positioned, styled element on a report page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Degrees, accumulated across rotate drags without normalization
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(flatten)]
    pub style: WidgetStyle,
    #[serde(flatten)]
    pub text_style: TextStyle,
    #[serde(default)]
    pub responsive: Responsive,
}

impl Widget {
    /// Create a widget dropped at `(x, y)` on a page of the given effective size.
    ///
    /// Headers snap to the top-center of the page, footers to the
    /// bottom-center and data tables to the page center; everything else
    /// lands on the grid point nearest the drop position.
    pub fn create(kind: WidgetKind, x: f64, y: f64, page: PageSize) -> Widget {
        let (width, height) = kind.default_size();
        let mut widget = Widget {
            id: WidgetId::new(),
            kind,
            x: snap(x),
            y: snap(y),
            width: snap_size(f64::from(width)),
            height: snap_size(f64::from(height)),
            rotation: 0,
            text: if kind == WidgetKind::TextBox {
                DEFAULT_TEXTBOX_TEXT.to_string()
            } else {
                String::new()
            },
            image_src: None,
            style: WidgetStyle::default(),
            text_style: TextStyle::default(),
            responsive: Responsive::default(),
        };
        widget.apply_placement(page);
        widget
    }

    /// Move by a pointer delta. Headers and footers ignore the delta and stay
    /// pinned to the top/bottom center of the page.
    pub fn moved(&self, dx: f64, dy: f64, page: PageSize) -> Widget {
        let mut next = self.clone();
        next.x = snap(f64::from(self.x) + dx);
        next.y = snap(f64::from(self.y) + dy);
        if matches!(self.kind, WidgetKind::Header | WidgetKind::Footer) {
            next.apply_placement(page);
        }
        next
    }

    /// Resize from a handle by a pointer delta, keeping the opposite edge fixed
    pub fn resized(&self, direction: ResizeDirection, dx: f64, dy: f64) -> Widget {
        let mut next = self.clone();

        if direction.east {
            next.width = snap_size(f64::from(self.width) + dx);
        }
        if direction.west {
            let width = snap_size(f64::from(self.width) - dx);
            next.x = snap(f64::from(self.x) + f64::from(self.width) - f64::from(width));
            next.width = width;
        }
        if direction.south {
            next.height = snap_size(f64::from(self.height) + dy);
        }
        if direction.north {
            let height = snap_size(f64::from(self.height) - dy);
            next.y = snap(f64::from(self.y) + f64::from(self.height) - f64::from(height));
            next.height = height;
        }

        next
    }

    /// Rotate by the angle swept between two pointer angles (radians around
    /// the widget center)
    pub fn rotated(&self, start_angle: f64, current_angle: f64) -> Widget {
        let delta = round_half_up((current_angle - start_angle).to_degrees()) as i32;
        Widget {
            rotation: self.rotation.saturating_add(delta),
            ..self.clone()
        }
    }

    /// Merge-patch a single field by its serialized name (`opacity`,
    /// `textColor`, `x`, ...). Geometry is re-snapped after the patch.
    pub fn with_property(&self, key: &str, value: serde_json::Value) -> Result<Widget> {
        if matches!(key, "id" | "type") {
            return Err(CanvasError::ImmutableField(key.to_string()));
        }

        let invalid = |reason: String| CanvasError::InvalidProperty {
            key: key.to_string(),
            reason,
        };

        let serde_json::Value::Object(mut fields) =
            serde_json::to_value(self).map_err(|e| invalid(e.to_string()))?
        else {
            return Err(invalid("widget did not serialize to an object".to_string()));
        };

        if !fields.contains_key(key) {
            return Err(invalid("unknown property".to_string()));
        }
        // fractional or out-of-range geometry is snapped before it meets the i32 fields
        let value = match (key, value.as_f64()) {
            ("x" | "y", Some(n)) => serde_json::Value::from(snap(n)),
            ("width" | "height", Some(n)) => serde_json::Value::from(snap_size(n)),
            _ => value,
        };
        fields.insert(key.to_string(), value);

        let mut next: Widget = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| invalid(e.to_string()))?;
        next.snap_to_grid();
        Ok(next)
    }

    /// Center on the page (data-table placement)
    pub fn centered_on(&self, page: PageSize) -> Widget {
        let mut next = self.clone();
        next.center_on(page);
        next
    }

    /// Rotation folded into `[0, 360)`
    pub fn normalized_rotation(&self) -> i32 {
        self.rotation.rem_euclid(360)
    }

    /// Whether position and size satisfy the grid invariant
    pub fn is_grid_aligned(&self) -> bool {
        is_grid_aligned(self.x)
            && is_grid_aligned(self.y)
            && is_grid_aligned(self.width)
            && is_grid_aligned(self.height)
            && self.width >= crate::GRID_SIZE
            && self.height >= crate::GRID_SIZE
    }

    /// Force position and size onto the grid
    pub fn snap_to_grid(&mut self) {
        self.x = snap(f64::from(self.x));
        self.y = snap(f64::from(self.y));
        self.width = snap_size(f64::from(self.width));
        self.height = snap_size(f64::from(self.height));
    }

    fn apply_placement(&mut self, page: PageSize) {
        match self.kind {
            WidgetKind::Header => {
                self.x = snap((f64::from(page.width) - f64::from(self.width)) / 2.0);
                self.y = 0;
            }
            WidgetKind::Footer => {
                self.x = snap((f64::from(page.width) - f64::from(self.width)) / 2.0);
                self.y = snap(f64::from(page.height) - f64::from(self.height));
            }
            WidgetKind::DataTable => self.center_on(page),
            _ => {}
        }
    }

    fn center_on(&mut self, page: PageSize) {
        let width = snap(f64::from(self.width));
        let height = snap(f64::from(self.height));
        self.x = snap((f64::from(page.width) - f64::from(width)) / 2.0);
        self.y = snap((f64::from(page.height) - f64::from(height)) / 2.0);
    }
}

/// Create a widget from its type name. Unknown names produce no widget.
pub fn create_widget(type_name: &str, x: f64, y: f64, page: PageSize) -> Option<Widget> {
    let kind = type_name.parse::<WidgetKind>().ok()?;
    Some(Widget::create(kind, x, y, page))
}
