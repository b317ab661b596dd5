//! Device frames.

use crate::renderer::{RenderError, RenderResult};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// A target surface: virtual size and the scale mapping it to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceFrame {
    /// Size in virtual units.
    pub size: Size,
    /// Screen pixels per virtual unit.
    pub scale: f64,
}

impl DeviceFrame {
    /// The fixed phone frame of the public viewer.
    pub const PUBLIC: DeviceFrame = DevicePreset::IPhone.frame();

    /// A custom frame. The scale must be finite and positive and the size
    /// non-empty.
    pub fn new(width: f64, height: f64, scale: f64) -> RenderResult<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height) && valid(scale)) {
            return Err(RenderError::InvalidFrame {
                width,
                height,
                scale,
            });
        }
        Ok(Self {
            size: Size::new(width, height),
            scale,
        })
    }

    /// Size of the surface in screen pixels.
    pub fn screen_size(&self) -> Size {
        self.size * self.scale
    }
}

impl Default for DeviceFrame {
    fn default() -> Self {
        Self::PUBLIC
    }
}

/// Named device frames offered by the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreset {
    #[default]
    IPhone,
    Android,
    IPad,
    Desktop,
}

impl DevicePreset {
    pub const ALL: [DevicePreset; 4] = [
        DevicePreset::IPhone,
        DevicePreset::Android,
        DevicePreset::IPad,
        DevicePreset::Desktop,
    ];

    pub const fn frame(self) -> DeviceFrame {
        let (width, height, scale) = match self {
            DevicePreset::IPhone => (375.0, 667.0, 1.0),
            DevicePreset::Android => (360.0, 640.0, 1.0),
            DevicePreset::IPad => (768.0, 1024.0, 0.65),
            DevicePreset::Desktop => (1200.0, 800.0, 0.75),
        };
        DeviceFrame {
            size: Size::new(width, height),
            scale,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DevicePreset::IPhone => "iphone",
            DevicePreset::Android => "android",
            DevicePreset::IPad => "ipad",
            DevicePreset::Desktop => "desktop",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_frames() {
        assert_eq!(DevicePreset::IPad.frame().scale, 0.65);
        assert_eq!(DevicePreset::Desktop.frame().size, Size::new(1200.0, 800.0));
        assert_eq!(DeviceFrame::PUBLIC, DevicePreset::IPhone.frame());
    }

    #[test]
    fn test_screen_size() {
        let frame = DevicePreset::Desktop.frame();
        assert_eq!(frame.screen_size(), Size::new(900.0, 600.0));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DevicePreset::from_name("iPad"), Some(DevicePreset::IPad));
        assert_eq!(DevicePreset::from_name("watch"), None);
    }

    #[test]
    fn test_invalid_custom_frame() {
        assert!(DeviceFrame::new(100.0, 100.0, 0.0).is_err());
        assert!(DeviceFrame::new(f64::NAN, 100.0, 1.0).is_err());
        assert!(DeviceFrame::new(320.0, 480.0, 2.0).is_ok());
    }
}
