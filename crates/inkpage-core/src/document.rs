//! Composition document: background plus z-ordered elements.

use crate::background::Background;
use crate::elements::{
    DrawingPath, Element, ElementContent, ElementId, ElementKind, ElementPatch, MediaSource,
};
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{ElementFrame, clamp_size};
use crate::persisted::{
    PersistedBackground, PersistedDocument, PersistedElement, RejectedElement, resolve_background,
};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Position of elements added without one, in virtual units.
pub const DEFAULT_ELEMENT_POSITION: Point = Point::new(50.0, 50.0);

/// Page metadata owned by the surrounding CRUD layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            description: None,
        }
    }
}

/// Outcome of loading a persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Elements that were left out.
    pub rejected: Vec<RejectedElement>,
    /// Elements whose id clashed with an earlier one and was regenerated.
    pub renamed: Vec<String>,
    /// Whether the background fell back to the default gradient.
    pub background_defaulted: bool,
    /// Elements loaded.
    pub loaded: usize,
    /// Strokes among the loaded elements.
    pub strokes: usize,
}

impl LoadReport {
    /// True when every element loaded as stored.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.renamed.is_empty()
    }
}

/// Background and ordered elements of one page.
///
/// List order is paint order: index 0 paints first, later elements paint on
/// top. All geometry is in virtual units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionDocument {
    pub background: Background,
    elements: Vec<Element>,
    pub metadata: PageMetadata,
}

impl CompositionDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new element of `kind` with its defaults on top of the stack.
    ///
    /// Strokes are only created by committing captured ink, see
    /// [`push_stroke`](Self::push_stroke).
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        position: Option<Point>,
    ) -> CanvasResult<&Element> {
        if kind == ElementKind::Stroke {
            return Err(CanvasError::NotAddable(kind.wire_name()));
        }
        let frame = ElementFrame::new(
            position.unwrap_or(DEFAULT_ELEMENT_POSITION),
            kind.default_size(),
        );
        let element = Element::new(frame, ElementContent::default_for(kind));
        log::debug!("Added {} element {}", kind.wire_name(), element.id());
        self.elements.push(element);
        Ok(&self.elements[self.elements.len() - 1])
    }

    /// Append a committed stroke on top of the stack.
    pub fn push_stroke(&mut self, path: DrawingPath) -> ElementId {
        let element = Element::stroke(path);
        let id = element.id().clone();
        self.elements.push(element);
        id
    }

    /// Merge the set fields of `patch` into an element.
    ///
    /// Sizes are clamped to `min_size`. Strokes accept only empty patches.
    /// Nothing is applied when the patch is rejected, and the element keeps
    /// its place in the stack.
    pub fn update_element(
        &mut self,
        id: &ElementId,
        patch: &ElementPatch,
        min_size: Size,
    ) -> CanvasResult<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        let invalid = |reason: &str| CanvasError::InvalidOperation {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        if !element.is_manipulable() {
            return if patch.is_empty() {
                Ok(())
            } else {
                Err(invalid("strokes are immutable"))
            };
        }
        if patch.text_style.is_some() && element.kind() != ElementKind::Text {
            return Err(invalid("text style applies to text elements only"));
        }
        let finite = |p: Point| p.x.is_finite() && p.y.is_finite();
        if patch.position.is_some_and(|p| !finite(p))
            || patch.size.is_some_and(|s| !s.is_finite())
            || patch.rotation.is_some_and(|r| !r.is_finite())
        {
            return Err(invalid("geometry must be finite"));
        }

        if let Some(position) = patch.position {
            element.frame.position = position;
        }
        if let Some(size) = patch.size {
            element.frame.size = clamp_size(size, min_size);
        }
        if let Some(rotation) = patch.rotation {
            element.frame.rotation = rotation;
        }
        if let Some(content) = &patch.content {
            match &mut element.content {
                ElementContent::Text(block) => block.body = content.clone(),
                ElementContent::Image(source) | ElementContent::Video(source) => {
                    *source = MediaSource::parse(content)
                }
                ElementContent::Link(url) => *url = content.clone(),
                ElementContent::Stroke(_) => {}
            }
        }
        if let (Some(style), ElementContent::Text(block)) = (&patch.text_style, &mut element.content) {
            block.style.apply(style);
        }
        Ok(())
    }

    /// Embed an uploaded blob into an image or video element.
    pub fn attach_media(
        &mut self,
        id: &ElementId,
        data: &[u8],
        mime: Option<&str>,
    ) -> CanvasResult<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        match &mut element.content {
            ElementContent::Image(source) | ElementContent::Video(source) => {
                *source = MediaSource::from_bytes(data, mime);
                log::debug!("Embedded {} bytes into {}", data.len(), id);
                Ok(())
            }
            _ => Err(CanvasError::InvalidOperation {
                id: id.to_string(),
                reason: "media can only be attached to image and video elements".to_string(),
            }),
        }
    }

    /// Remove an element and return it.
    pub fn remove_element(&mut self, id: &ElementId) -> CanvasResult<Element> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        Ok(self.elements.remove(index))
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Top-most manipulable element under `point` (virtual units).
    pub fn element_at(&self, point: Point) -> Option<&Element> {
        self.elements.iter().rev().find(|e| e.hit_test(point))
    }

    /// Committed strokes in paint order.
    pub fn strokes(&self) -> impl Iterator<Item = (&ElementId, &DrawingPath)> {
        self.elements
            .iter()
            .filter_map(|e| e.as_stroke().map(|path| (e.id(), path)))
    }

    /// Remove every stroke, leaving other elements in place. Returns how many
    /// were removed.
    pub fn clear_strokes(&mut self) -> usize {
        let before = self.elements.len();
        self.elements.retain(Element::is_manipulable);
        before - self.elements.len()
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: &ElementId) -> CanvasResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        let element = self.elements.remove(index);
        self.elements.push(element);
        Ok(())
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: &ElementId) -> CanvasResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        let element = self.elements.remove(index);
        self.elements.insert(0, element);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Wire form of the document.
    pub fn serialize(&self) -> PersistedDocument {
        PersistedDocument {
            background: Some(PersistedBackground::from(&self.background)),
            elements: self.elements.iter().map(PersistedElement::from).collect(),
            rejected: Vec::new(),
        }
    }

    /// Rebuild a document from its wire form.
    ///
    /// Unknown or malformed elements are dropped and reported; an unusable
    /// background becomes the default gradient.
    pub fn deserialize(persisted: &PersistedDocument) -> (Self, LoadReport) {
        let (background, background_defaulted) = resolve_background(persisted.background.as_ref());
        let mut report = LoadReport {
            rejected: persisted.rejected.clone(),
            background_defaulted,
            ..LoadReport::default()
        };

        let mut seen = HashSet::new();
        let mut elements = Vec::with_capacity(persisted.elements.len());
        for (index, stored) in persisted.elements.iter().enumerate() {
            match stored.to_element() {
                Ok(mut element) => {
                    if !seen.insert(element.id().clone()) {
                        log::warn!("Duplicate element id {}, assigning a fresh one", element.id());
                        report.renamed.push(element.id().to_string());
                        element.id = ElementId::generate();
                        seen.insert(element.id().clone());
                    }
                    if !element.is_manipulable() {
                        report.strokes += 1;
                    }
                    elements.push(element);
                }
                Err(reason) => {
                    log::warn!("Skipping element {}: {}", stored.id, reason);
                    report.rejected.push(RejectedElement {
                        index,
                        id: Some(stored.id.clone()),
                        reason,
                    });
                }
            }
        }
        report.loaded = elements.len();

        let document = Self {
            background,
            elements,
            metadata: PageMetadata::default(),
        };
        (document, report)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.serialize().to_json()
    }

    pub fn from_json(json: &str) -> Result<(Self, LoadReport), serde_json::Error> {
        let persisted = PersistedDocument::from_json(json)?;
        Ok(Self::deserialize(&persisted))
    }
}
