//! Editor configuration.

use crate::elements::SerializableColor;
use crate::geometry::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;
/// Distance from an element's top edge to its rotate handle, in virtual units.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;
/// Default ink line width in virtual units.
pub const DEFAULT_INK_WIDTH: f64 = 3.0;

/// Tunables of an editing session.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Size floor applied by resizing and size patches.
    pub min_element_size: Size,
    /// Handle hit radius in screen pixels (divided by the device scale).
    pub handle_hit_tolerance: f64,
    /// Rotate handle distance above the element's top edge.
    pub rotate_handle_offset: f64,
    /// Where elements land when added without a position.
    pub default_position: Point,
    pub ink_color: SerializableColor,
    pub ink_width: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_element_size: Size::new(MIN_ELEMENT_WIDTH, MIN_ELEMENT_HEIGHT),
            handle_hit_tolerance: HANDLE_HIT_TOLERANCE,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
            default_position: Point::new(50.0, 50.0),
            ink_color: SerializableColor::white(),
            ink_width: DEFAULT_INK_WIDTH,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace nonsensical values with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_element_size.width) || !positive(self.min_element_size.height) {
            log::warn!(
                "Ignoring invalid minimum element size {:?}",
                self.min_element_size
            );
            self.min_element_size = defaults.min_element_size;
        }
        if !positive(self.handle_hit_tolerance) {
            self.handle_hit_tolerance = defaults.handle_hit_tolerance;
        }
        if !self.rotate_handle_offset.is_finite() || self.rotate_handle_offset < 0.0 {
            self.rotate_handle_offset = defaults.rotate_handle_offset;
        }
        if !positive(self.ink_width) {
            self.ink_width = defaults.ink_width;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json(r#"{"inkWidth": 6.0, "handleHitTolerance": 20.0}"#)
            .unwrap();
        assert_eq!(config.ink_width, 6.0);
        assert_eq!(config.handle_hit_tolerance, 20.0);
        assert_eq!(config.min_element_size, Size::new(50.0, 30.0));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = EditorConfig::from_json(
            r#"{"minElementSize": {"width": -1.0, "height": 30.0}, "inkWidth": 0.0}"#,
        )
        .unwrap();
        assert_eq!(config.min_element_size, Size::new(50.0, 30.0));
        assert_eq!(config.ink_width, DEFAULT_INK_WIDTH);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(EditorConfig::from_json("{inkWidth").is_err());
    }
}
