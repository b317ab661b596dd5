//! Wire form of a page document.
//!
//! This is the contract shared by the editor, the persistence collaborator
//! and the read-only viewers. Field names and the coordinate convention
//! (virtual units) must not change.

use crate::background::Background;
use crate::config::DEFAULT_INK_WIDTH;
use crate::elements::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DrawingPath, Element, ElementContent, ElementId,
    ElementKind, MediaSource, SerializableColor, TextBlock, TextStyle,
};
use crate::geometry::ElementFrame;
use kurbo::{Point, Size};
use serde::{Deserialize, Deserializer, Serialize};

/// Width used when a persisted element carries none.
pub const FALLBACK_WIDTH: f64 = 150.0;
/// Height used when a persisted element carries none.
pub const FALLBACK_HEIGHT: f64 = 50.0;

/// Persisted `{type, value}` background descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedBackground {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl From<&Background> for PersistedBackground {
    fn from(background: &Background) -> Self {
        Self {
            kind: background.kind().wire_name().to_string(),
            value: background.wire_value(),
        }
    }
}

/// Kind-dependent style attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Only meaningful for `drawing` elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

/// One persisted element.
///
/// Geometry fields are optional on input; missing values take the viewer
/// fallbacks (`0, 0, 150 x 50, 0deg`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedElement {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: PersistedStyle,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why an element was left out of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedElement {
    /// Position in the persisted `elements` array.
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Persisted page document.
///
/// Deserialization never fails because of a single element: unreadable
/// entries are collected in [`rejected`](Self::rejected) and the rest load
/// normally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct PersistedDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<PersistedBackground>,
    pub elements: Vec<PersistedElement>,
    #[serde(skip)]
    pub rejected: Vec<RejectedElement>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    background: Option<serde_json::Value>,
    #[serde(default)]
    elements: Vec<serde_json::Value>,
}

impl From<RawDocument> for PersistedDocument {
    fn from(raw: RawDocument) -> Self {
        let background = raw.background.and_then(|value| {
            if value.is_null() {
                return None;
            }
            serde_json::from_value::<PersistedBackground>(value)
                .map_err(|e| log::warn!("Unreadable background descriptor: {}", e))
                .ok()
        });

        let mut elements = Vec::with_capacity(raw.elements.len());
        let mut rejected = Vec::new();
        for (index, value) in raw.elements.into_iter().enumerate() {
            let id = value.get("id").map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            match serde_json::from_value::<PersistedElement>(value) {
                Ok(element) => elements.push(element),
                Err(e) => {
                    log::warn!("Skipping malformed element #{}: {}", index, e);
                    rejected.push(RejectedElement {
                        index,
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Self {
            background,
            elements,
            rejected,
        }
    }
}

impl PersistedDocument {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&Element> for PersistedElement {
    fn from(element: &Element) -> Self {
        let frame = element.frame;
        let (content, style) = match &element.content {
            ElementContent::Text(block) => (
                block.body.clone(),
                PersistedStyle {
                    font_size: Some(block.style.font_size),
                    font_family: Some(block.style.font_family.clone()),
                    color: Some(block.style.color.to_css()),
                    bold: Some(block.style.bold),
                    italic: Some(block.style.italic),
                    underline: Some(block.style.underline),
                    line_width: None,
                },
            ),
            ElementContent::Image(source) | ElementContent::Video(source) => {
                (source.to_content(), PersistedStyle::default())
            }
            ElementContent::Link(url) => (url.clone(), PersistedStyle::default()),
            ElementContent::Stroke(path) => (
                path.to_json_points(),
                PersistedStyle {
                    color: Some(path.color().to_css()),
                    line_width: Some(path.width()),
                    ..PersistedStyle::default()
                },
            ),
        };

        Self {
            id: element.id().to_string(),
            kind: element.kind().wire_name().to_string(),
            content,
            x: Some(frame.position.x),
            y: Some(frame.position.y),
            width: Some(frame.size.width),
            height: Some(frame.size.height),
            rotation: Some(frame.rotation),
            style,
        }
    }
}

impl PersistedElement {
    /// Rebuild an in-memory element.
    ///
    /// Fails for unknown types and unreadable drawing content; the caller
    /// drops the element and keeps loading.
    pub fn to_element(&self) -> Result<Element, String> {
        let kind = ElementKind::from_wire(&self.kind)
            .ok_or_else(|| format!("unknown element type '{}'", self.kind))?;

        let finite_or = |v: Option<f64>, fallback: f64| v.filter(|v| v.is_finite()).unwrap_or(fallback);
        let extent_or = |v: Option<f64>, fallback: f64| {
            v.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(fallback)
        };

        let mut frame = ElementFrame::new(
            Point::new(finite_or(self.x, 0.0), finite_or(self.y, 0.0)),
            Size::new(
                extent_or(self.width, FALLBACK_WIDTH),
                extent_or(self.height, FALLBACK_HEIGHT),
            ),
        );
        frame.rotation = finite_or(self.rotation, 0.0);

        let style_color = self.style.color.as_deref().and_then(SerializableColor::parse);
        let content = match kind {
            ElementKind::Text => ElementContent::Text(TextBlock {
                body: self.content.clone(),
                style: TextStyle {
                    font_family: self
                        .style
                        .font_family
                        .clone()
                        .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
                    font_size: self
                        .style
                        .font_size
                        .filter(|s| s.is_finite() && *s > 0.0)
                        .unwrap_or(DEFAULT_FONT_SIZE),
                    color: style_color.unwrap_or(SerializableColor::black()),
                    bold: self.style.bold.unwrap_or(false),
                    italic: self.style.italic.unwrap_or(false),
                    underline: self.style.underline.unwrap_or(false),
                },
            }),
            ElementKind::Image => ElementContent::Image(MediaSource::parse(&self.content)),
            ElementKind::Video => ElementContent::Video(MediaSource::parse(&self.content)),
            ElementKind::Link => ElementContent::Link(self.content.clone()),
            ElementKind::Stroke => {
                let width = self
                    .style
                    .line_width
                    .filter(|w| w.is_finite() && *w > 0.0)
                    .unwrap_or(DEFAULT_INK_WIDTH);
                let path = DrawingPath::from_json_points(
                    &self.content,
                    style_color.unwrap_or(SerializableColor::white()),
                    width,
                )
                .map_err(|e| format!("malformed drawing content: {e}"))?;
                let bounds = path.bounds();
                frame = ElementFrame::new(bounds.origin(), bounds.size());
                ElementContent::Stroke(path)
            }
        };

        let id = if self.id.is_empty() {
            ElementId::generate()
        } else {
            ElementId::from(self.id.as_str())
        };
        Ok(Element::with_id(id, frame, content))
    }
}

/// Resolve a persisted background, falling back to the default gradient.
///
/// Returns the background and whether the fallback was used.
pub(crate) fn resolve_background(persisted: Option<&PersistedBackground>) -> (Background, bool) {
    let Some(persisted) = persisted else {
        return (Background::default(), true);
    };
    match Background::from_wire(&persisted.kind, &persisted.value) {
        Some(background) => (background, false),
        None => {
            log::warn!(
                "Unusable background {{type: {}, value: {}}}, using default gradient",
                persisted.kind,
                persisted.value
            );
            (Background::default(), true)
        }
    }
}
