//! Settings for the keyframe engine.
//!
//! Values come from `keyframe.toml` and may be overridden by `KEYFRAME_*`
//! environment variables. The property tables decide which calculator
//! animates a given style property.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root of `keyframe.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeyframeConfig {
    /// Property name tables used to pick a calculator per property
    pub properties: PropertyTableConfig,
    /// Player defaults and validation policy
    pub player: PlayerConfig,
    /// Logging settings for the demo driver
    pub logging: LoggingConfig,
}

/// Property classification tables.
///
/// Names are written in camelCase. Lookup order is dimensional, rounded
/// numeric, numeric, transform, color; the first list containing a name wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyTableConfig {
    /// Unit-suffixed properties (`width: 10px`)
    pub dimensional: Vec<String>,
    /// Unit-less properties rounded to whole numbers (`zIndex`)
    pub rounded_numeric: Vec<String>,
    /// Unit-less decimal properties (`opacity`)
    pub numeric: Vec<String>,
    /// Composite transform function lists
    pub transform: Vec<String>,
    /// Color properties
    pub color: Vec<String>,
}

/// `[player]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Reject unrecognized fill tokens instead of falling back to `none`
    pub strict_fill: bool,
    /// Easing used when the timing input names none
    pub default_easing: String,
}

/// `[logging]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level for the demo subscriber (trace, debug, info, warn, error)
    pub level: String,
}

const DIMENSIONAL_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "minWidth",
    "minHeight",
    "maxWidth",
    "maxHeight",
    "top",
    "right",
    "bottom",
    "left",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "borderTopWidth",
    "borderRightWidth",
    "borderBottomWidth",
    "borderLeftWidth",
    "borderTopLeftRadius",
    "borderTopRightRadius",
    "borderBottomLeftRadius",
    "borderBottomRightRadius",
    "outlineWidth",
    "outlineOffset",
    "fontSize",
    "letterSpacing",
    "wordSpacing",
    "textIndent",
    "columnGap",
    "rowGap",
    "flexBasis",
];

const ROUNDED_NUMERIC_PROPERTIES: &[&str] = &["zIndex", "fontWeight", "order"];

const NUMERIC_PROPERTIES: &[&str] = &["opacity", "flexGrow", "flexShrink", "lineHeight"];

const TRANSFORM_PROPERTIES: &[&str] = &["transform"];

const COLOR_PROPERTIES: &[&str] = &[
    "backgroundColor",
    "borderBottomColor",
    "borderLeftColor",
    "borderRightColor",
    "borderTopColor",
    "color",
    "columnRuleColor",
    "outlineColor",
];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl Default for PropertyTableConfig {
    fn default() -> Self {
        Self {
            dimensional: owned(DIMENSIONAL_PROPERTIES),
            rounded_numeric: owned(ROUNDED_NUMERIC_PROPERTIES),
            numeric: owned(NUMERIC_PROPERTIES),
            transform: owned(TRANSFORM_PROPERTIES),
            color: owned(COLOR_PROPERTIES),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            strict_fill: true,
            default_easing: "linear".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl KeyframeConfig {
    /// Read and parse a `keyframe.toml` at `path`.
    ///
    /// Missing keys keep their defaults. The error string names the failing
    /// step (read or parse).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))
            .and_then(|content| Self::from_toml_str(&content))
    }

    /// Parse TOML text; see [`load_from_file`](Self::load_from_file).
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// `keyframe.toml` from the working directory, or the built-in defaults.
    pub fn load_or_default() -> Self {
        Self::load_from_file("keyframe.toml").unwrap_or_default()
    }

    /// Apply `KEYFRAME_STRICT_FILL`, `KEYFRAME_DEFAULT_EASING` and
    /// `KEYFRAME_LOG` on top of the loaded values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("KEYFRAME_STRICT_FILL") {
            self.player.strict_fill = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(easing) = std::env::var("KEYFRAME_DEFAULT_EASING") {
            if !easing.trim().is_empty() {
                self.player.default_easing = easing;
            }
        }
        if let Ok(level) = std::env::var("KEYFRAME_LOG") {
            self.logging.level = level;
        }
    }

    /// File (or defaults) first, then environment overrides.
    pub fn load() -> Self {
        let mut loaded = Self::load_or_default();
        loaded.merge_with_env();
        loaded
    }
}
