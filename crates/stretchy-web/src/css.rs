#![forbid(unsafe_code)]

//! CSS names and value formatting shared with the host stylesheet.

use stretchy_core::DisplayStyle;

/// Class on every character span.
pub const CHAR_CLASS: &str = "char";
pub const CHAR_SELECTOR: &str = ".char";
/// Attribute carrying a span's cell index.
pub const INDEX_ATTR: &str = "data-index";
/// Body class while a character is grabbed.
pub const GRAB_CLASS: &str = "grab";
/// Custom property holding the resting font weight.
pub const REST_WEIGHT_PROPERTY: &str = "--fw";
/// Custom property holding the resting font stretch.
pub const REST_STRETCH_PROPERTY: &str = "--fs";

/// Property values written to one character span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellCss {
    pub transform: String,
    pub font_weight: String,
    pub font_stretch: String,
}

impl From<&DisplayStyle> for CellCss {
    fn from(style: &DisplayStyle) -> Self {
        Self {
            transform: format!(
                "translateY({}px) scaleY({})",
                number(style.offset_y),
                number(style.scale_y)
            ),
            font_weight: style.weight.to_string(),
            font_stretch: format!("{}%", style.stretch),
        }
    }
}

/// Format a CSS number. Non-finite values and negative zero become `0`.
fn number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_owned();
    }
    value.to_string()
}

/// Parse a `data-index` attribute.
#[must_use]
pub fn parse_index(raw: &str) -> Option<usize> {
    raw.trim().parse().ok()
}
