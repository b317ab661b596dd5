//! Text element payload.

use super::SerializableColor;
use serde::{Deserialize, Serialize};

/// Font size of new text elements.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Font family of new text elements.
pub const DEFAULT_FONT_FAMILY: &str = "Roboto";

/// Visual attributes of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in virtual units.
    pub font_size: f64,
    pub color: SerializableColor,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: SerializableColor::black(),
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

impl TextStyle {
    /// Merge the set fields of `patch`.
    pub fn apply(&mut self, patch: &TextStylePatch) {
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
        if let Some(size) = patch.font_size {
            if size.is_finite() && size > 0.0 {
                self.font_size = size;
            }
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(underline) = patch.underline {
            self.underline = underline;
        }
    }
}

/// Partial text style update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStylePatch {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<SerializableColor>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

/// Body and style of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub body: String,
    pub style: TextStyle,
}

impl TextBlock {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            style: TextStyle::default(),
        }
    }
}

impl Default for TextBlock {
    fn default() -> Self {
        Self::new("Text")
    }
}
