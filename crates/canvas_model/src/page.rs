//! Page presets and page configuration
//!
//! A page is either one of a closed set of named presets or `free`, whose
//! dimensions are `auto` and defer to the measured size of the canvas
//! container. Custom sizes only arrive through stored layouts.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key of the auto-sized page preset
pub const FREE_PAGE_KEY: &str = "free";

/// Key recorded for stored layouts whose page key is not a preset
pub const CUSTOM_PAGE_KEY: &str = "custom";

// =============================================================================
// Page Dimension
// =============================================================================

/// One page dimension: a fixed pixel value or `auto`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageDimension {
    /// Use the measured container size
    #[default]
    Auto,
    /// Fixed size in pixels
    Px(i32),
}

impl PageDimension {
    pub fn is_auto(&self) -> bool {
        matches!(self, PageDimension::Auto)
    }

    /// Resolve against a measured size
    pub fn resolve(&self, measured: i32) -> i32 {
        match self {
            PageDimension::Auto => measured,
            PageDimension::Px(px) => *px,
        }
    }

    /// The fixed pixel value, if any
    pub fn as_px(&self) -> Option<i32> {
        match self {
            PageDimension::Auto => None,
            PageDimension::Px(px) => Some(*px),
        }
    }
}

impl std::fmt::Display for PageDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageDimension::Auto => write!(f, "auto"),
            PageDimension::Px(px) => write!(f, "{}", px),
        }
    }
}

impl Serialize for PageDimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageDimension::Auto => serializer.serialize_str("auto"),
            PageDimension::Px(px) => serializer.serialize_i32(*px),
        }
    }
}

struct PageDimensionVisitor;

impl<'de> Visitor<'de> for PageDimensionVisitor {
    type Value = PageDimension;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a pixel number or \"auto\"")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(PageDimension::Px)
            .map_err(|_| E::custom(format!("page dimension out of range: {}", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(PageDimension::Px)
            .map_err(|_| E::custom(format!("page dimension out of range: {}", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() {
            Ok(PageDimension::Px(v.round() as i32))
        } else {
            Err(E::custom("page dimension is not finite"))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return Ok(PageDimension::Auto);
        }
        trimmed
            .trim_end_matches("px")
            .parse::<f64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            .and_then(|n| self.visit_f64(n))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PageDimension::Auto)
    }
}

impl<'de> Deserialize<'de> for PageDimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PageDimensionVisitor)
    }
}

// =============================================================================
// Effective Page Size
// =============================================================================

/// A fully resolved page size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSize {
    pub width: i32,
    pub height: i32,
}

impl PageSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// Presets
// =============================================================================

/// A named page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePreset {
    pub key: &'static str,
    pub label: &'static str,
    pub width: PageDimension,
    pub height: PageDimension,
}

impl PagePreset {
    /// Resolve `auto` components against the measured container size
    pub fn effective_size(&self, measured: PageSize) -> PageSize {
        resolve_effective_size(self.width, self.height, measured)
    }

    pub fn is_free(&self) -> bool {
        self.key == FREE_PAGE_KEY
    }
}

/// The closed set of page presets; the first entry is the fallback
pub const PAGE_PRESETS: [PagePreset; 5] = [
    PagePreset {
        key: FREE_PAGE_KEY,
        label: "Free Size",
        width: PageDimension::Auto,
        height: PageDimension::Auto,
    },
    PagePreset {
        key: "a4-portrait",
        label: "A4 Portrait",
        width: PageDimension::Px(595),
        height: PageDimension::Px(842),
    },
    PagePreset {
        key: "a4l",
        label: "A4 Landscape",
        width: PageDimension::Px(1123),
        height: PageDimension::Px(794),
    },
    PagePreset {
        key: "letterp",
        label: "Letter Portrait",
        width: PageDimension::Px(816),
        height: PageDimension::Px(1056),
    },
    PagePreset {
        key: "letterl",
        label: "Letter Landscape",
        width: PageDimension::Px(1056),
        height: PageDimension::Px(816),
    },
];

/// Exact lookup of a preset key
pub fn find_page_preset(key: &str) -> Option<&'static PagePreset> {
    PAGE_PRESETS.iter().find(|preset| preset.key == key)
}

/// Look up a preset, falling back to `free` for unknown keys
pub fn resolve_page_preset(key: &str) -> &'static PagePreset {
    find_page_preset(key).unwrap_or(&PAGE_PRESETS[0])
}

/// Take the measured size wherever a dimension is `auto`
pub fn resolve_effective_size(
    width: PageDimension,
    height: PageDimension,
    measured: PageSize,
) -> PageSize {
    PageSize {
        width: width.resolve(measured.width),
        height: height.resolve(measured.height),
    }
}

// =============================================================================
// Page Configuration
// =============================================================================

/// Page configuration of a canvas document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Preset key, `free`, or a custom key carried from a stored layout
    pub key: String,
    #[serde(default)]
    pub width: PageDimension,
    #[serde(default)]
    pub height: PageDimension,
    #[serde(default)]
    pub label: String,
}

impl PageConfig {
    /// Configuration for a preset key; unknown keys resolve to `free`
    pub fn from_preset(key: &str) -> Self {
        let preset = resolve_page_preset(key);
        Self {
            key: preset.key.to_string(),
            width: preset.width,
            height: preset.height,
            label: preset.label.to_string(),
        }
    }

    /// A custom page size that is not backed by a preset
    pub fn custom(key: impl Into<String>, width: PageDimension, height: PageDimension, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            width,
            height,
            label: label.into(),
        }
    }

    /// The preset backing this configuration, if the key is known
    pub fn preset(&self) -> Option<&'static PagePreset> {
        find_page_preset(&self.key)
    }

    /// Whether the dimensions come from the preset table
    pub fn is_preset(&self) -> bool {
        self.preset().is_some()
    }

    /// Resolve against the measured container size.
    ///
    /// Known preset keys always use the preset dimensions, whatever is stored
    /// alongside them.
    pub fn effective_size(&self, measured: PageSize) -> PageSize {
        match self.preset() {
            Some(preset) => preset.effective_size(measured),
            None => resolve_effective_size(self.width, self.height, measured),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::from_preset(FREE_PAGE_KEY)
    }
}
