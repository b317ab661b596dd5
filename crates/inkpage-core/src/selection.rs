//! Selection and manipulation handles.

use crate::elements::{Element, ElementId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 12.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Bottom-right corner; drags resize the element.
    Resize,
    /// Above the top edge; drags rotate the element about its center.
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in virtual units.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in virtual units) hits this handle.
    /// `tolerance` must already be converted to virtual units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Handles of an element, following its rotation.
///
/// Strokes have none.
pub fn get_handles(element: &Element, rotate_offset: f64) -> Vec<Handle> {
    if !element.is_manipulable() {
        return Vec::new();
    }
    let frame = &element.frame;
    let size = frame.size;
    vec![
        Handle::new(
            frame.local_to_virtual(Point::new(size.width, size.height)),
            HandleKind::Resize,
        ),
        Handle::new(
            frame.local_to_virtual(Point::new(size.width / 2.0, -rotate_offset)),
            HandleKind::Rotate,
        ),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(
    element: &Element,
    point: Point,
    tolerance: f64,
    rotate_offset: f64,
) -> Option<HandleKind> {
    get_handles(element, rotate_offset)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// The single selected element of an editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Option<ElementId>);

impl Selection {
    pub fn select(&mut self, id: ElementId) {
        if self.0.as_ref() != Some(&id) {
            log::debug!("Selected element {}", id);
        }
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn selected(&self) -> Option<&ElementId> {
        self.0.as_ref()
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.0.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}
