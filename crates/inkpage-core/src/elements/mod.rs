//! Element definitions for profile pages.

mod drawing;
mod media;
mod text;

pub use drawing::{DrawingPath, PathPoint};
pub use media::{MediaSource, VideoSource};
pub use text::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, TextBlock, TextStyle, TextStylePatch};

use crate::geometry::ElementFrame;
use kurbo::{Point, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)`,
    /// `transparent`, `black` and `white`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "transparent" => return Some(Self::transparent()),
            "black" => return Some(Self::black()),
            "white" => return Some(Self::white()),
            _ => {}
        }

        if let Some(hex) = value.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).ok();
            return match hex.len() {
                3 => {
                    let r = channel(&hex[0..1])? * 17;
                    let g = channel(&hex[1..2])? * 17;
                    let b = channel(&hex[2..3])? * 17;
                    Some(Self::new(r, g, b, 255))
                }
                6 => Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    255,
                )),
                8 => Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => None,
            };
        }

        let lower = value.to_ascii_lowercase();
        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let r = parts[0].parse::<u8>().ok()?;
        let g = parts[1].parse::<u8>().ok()?;
        let b = parts[2].parse::<u8>().ok()?;
        let a = match parts.get(3) {
            Some(alpha) => (alpha.parse::<f64>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            None => 255,
        };
        Some(Self::new(r, g, b, a))
    }

    /// CSS hex form (`#rrggbb`, or `#rrggbbaa` when not opaque).
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Identifier of an element, unique within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The kinds of element a page can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Video,
    Link,
    /// Freehand ink. Spelled `drawing` on the wire.
    #[serde(rename = "drawing")]
    Stroke,
}

impl ElementKind {
    /// Name used in persisted documents.
    pub fn wire_name(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Video => "video",
            ElementKind::Link => "link",
            ElementKind::Stroke => "drawing",
        }
    }

    /// Parse a persisted type name.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "text" => Some(ElementKind::Text),
            "image" => Some(ElementKind::Image),
            "video" => Some(ElementKind::Video),
            "link" => Some(ElementKind::Link),
            "drawing" => Some(ElementKind::Stroke),
            _ => None,
        }
    }

    /// Size given to a freshly added element of this kind.
    pub fn default_size(self) -> Size {
        match self {
            ElementKind::Text => Size::new(200.0, 50.0),
            ElementKind::Image => Size::new(200.0, 200.0),
            ElementKind::Video => Size::new(320.0, 180.0),
            ElementKind::Link => Size::new(200.0, 50.0),
            ElementKind::Stroke => Size::ZERO,
        }
    }
}

/// Kind-dependent payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementContent {
    Text(TextBlock),
    Image(MediaSource),
    Video(MediaSource),
    /// Target URL of a link button.
    Link(String),
    Stroke(DrawingPath),
}

impl ElementContent {
    /// Default payload for a new element of `kind`.
    ///
    /// Strokes have no meaningful default and start as an empty path.
    pub fn default_for(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => ElementContent::Text(TextBlock::default()),
            ElementKind::Image => ElementContent::Image(MediaSource::Empty),
            ElementKind::Video => ElementContent::Video(MediaSource::Empty),
            ElementKind::Link => ElementContent::Link("https://".to_string()),
            ElementKind::Stroke => ElementContent::Stroke(DrawingPath::default()),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Text(_) => ElementKind::Text,
            ElementContent::Image(_) => ElementKind::Image,
            ElementContent::Video(_) => ElementKind::Video,
            ElementContent::Link(_) => ElementKind::Link,
            ElementContent::Stroke(_) => ElementKind::Stroke,
        }
    }
}

/// A placed object on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    /// Placement in virtual units.
    pub frame: ElementFrame,
    pub content: ElementContent,
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(frame: ElementFrame, content: ElementContent) -> Self {
        Self::with_id(ElementId::generate(), frame, content)
    }

    pub fn with_id(id: ElementId, frame: ElementFrame, content: ElementContent) -> Self {
        Self { id, frame, content }
    }

    /// Wrap a committed stroke. The frame is the bounding box of its points.
    pub fn stroke(path: DrawingPath) -> Self {
        let bounds = path.bounds();
        let frame = ElementFrame::new(bounds.origin(), bounds.size());
        Self::new(frame, ElementContent::Stroke(path))
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Whether drag, resize and rotate gestures may act on this element.
    /// Ink is immutable once committed.
    pub fn is_manipulable(&self) -> bool {
        !matches!(self.content, ElementContent::Stroke(_))
    }

    /// Hit test in virtual units.
    pub fn hit_test(&self, point: Point) -> bool {
        self.is_manipulable() && self.frame.contains(point)
    }

    pub fn as_stroke(&self) -> Option<&DrawingPath> {
        match &self.content {
            ElementContent::Stroke(path) => Some(path),
            _ => None,
        }
    }
}

/// Partial update merged into an element by
/// [`CompositionDocument::update_element`](crate::document::CompositionDocument::update_element).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    /// Rotation in degrees.
    pub rotation: Option<f64>,
    /// Raw content string, interpreted by kind (text body, media reference, URL).
    pub content: Option<String>,
    pub text_style: Option<TextStylePatch>,
}

impl ElementPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(SerializableColor::parse("#fff"), Some(SerializableColor::white()));
        assert_eq!(
            SerializableColor::parse("#7c6afa"),
            Some(SerializableColor::new(0x7c, 0x6a, 0xfa, 255))
        );
        assert_eq!(
            SerializableColor::parse("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 0x80))
        );
        assert_eq!(SerializableColor::parse("#12"), None);
        assert_eq!(SerializableColor::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(
            SerializableColor::parse("rgb(10, 20, 30)"),
            Some(SerializableColor::new(10, 20, 30, 255))
        );
        assert_eq!(
            SerializableColor::parse("rgba(10,20,30,0.5)"),
            Some(SerializableColor::new(10, 20, 30, 128))
        );
        assert_eq!(SerializableColor::parse("hsl(1, 2, 3)"), None);
    }

    #[test]
    fn test_color_css_round_trip() {
        let c = SerializableColor::new(0xc8, 0x9a, 0xfc, 255);
        assert_eq!(c.to_css(), "#c89afc");
        assert_eq!(SerializableColor::parse(&c.to_css()), Some(c));
        let translucent = SerializableColor::new(1, 2, 3, 4);
        assert_eq!(translucent.to_css(), "#01020304");
    }

    #[test]
    fn test_peniko_conversion() {
        let c = SerializableColor::new(12, 34, 56, 200);
        let color: Color = c.into();
        assert_eq!(SerializableColor::from(color), c);
    }

    #[test]
    fn test_kind_wire_names() {
        for kind in [
            ElementKind::Text,
            ElementKind::Image,
            ElementKind::Video,
            ElementKind::Link,
            ElementKind::Stroke,
        ] {
            assert_eq!(ElementKind::from_wire(kind.wire_name()), Some(kind));
        }
        assert_eq!(ElementKind::from_wire("youtube"), None);
    }

    #[test]
    fn test_strokes_are_not_hit_targets() {
        let path = DrawingPath::new(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 100.0)],
            SerializableColor::white(),
            3.0,
        );
        let element = Element::stroke(path);
        assert!(!element.is_manipulable());
        assert!(!element.hit_test(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_default_link_content() {
        assert_eq!(
            ElementContent::default_for(ElementKind::Link),
            ElementContent::Link("https://".to_string())
        );
    }
}
