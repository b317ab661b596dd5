//! Drag, resize and rotate gestures.
//!
//! One gesture at a time: pointer-down picks the gesture, moves apply it to
//! the target element, and pointer-up or pointer-leave ends it. Positions
//! here are always in virtual units.

use crate::config::EditorConfig;
use crate::document::CompositionDocument;
use crate::elements::ElementId;
use crate::geometry::{bearing_degrees, clamp_size};
use crate::selection::{HandleKind, Selection, hit_test_handles};
use kurbo::{Point, Size};

/// The active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ManipulationState {
    #[default]
    Idle,
    Dragging { id: ElementId, drag_start: Point },
    Resizing { id: ElementId, drag_start: Point },
    Rotating { id: ElementId },
}

impl ManipulationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ManipulationState::Idle)
    }

    /// Element the gesture acts on.
    pub fn target(&self) -> Option<&ElementId> {
        match self {
            ManipulationState::Idle => None,
            ManipulationState::Dragging { id, .. }
            | ManipulationState::Resizing { id, .. }
            | ManipulationState::Rotating { id } => Some(id),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ManipulationState::Idle => "idle",
            ManipulationState::Dragging { .. } => "dragging",
            ManipulationState::Resizing { .. } => "resizing",
            ManipulationState::Rotating { .. } => "rotating",
        }
    }
}

/// What a pointer-down did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerDown {
    /// A gesture started on this element.
    Started(ElementId),
    /// Empty canvas was hit and the selection was cleared.
    Deselected,
    /// Nothing happened (gesture already active, or stray handle event).
    Ignored,
}

/// Gesture state machine.
#[derive(Debug, Clone)]
pub struct Manipulator {
    state: ManipulationState,
    min_size: Size,
    /// Handle hit radius in screen pixels.
    hit_tolerance: f64,
    rotate_offset: f64,
}

impl Manipulator {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: ManipulationState::Idle,
            min_size: config.min_element_size,
            hit_tolerance: config.handle_hit_tolerance,
            rotate_offset: config.rotate_handle_offset,
        }
    }

    pub fn state(&self) -> &ManipulationState {
        &self.state
    }

    fn transition(&mut self, next: ManipulationState) {
        if self.state.name() != next.name() {
            log::debug!("Manipulation {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }

    /// Pointer pressed at `point`.
    ///
    /// Handles of the selected element win over element bodies. A body hit
    /// selects the element and starts dragging it in the same event; a miss
    /// clears the selection.
    pub fn pointer_down(
        &mut self,
        document: &CompositionDocument,
        selection: &mut Selection,
        point: Point,
        device_scale: f64,
    ) -> PointerDown {
        if !self.state.is_idle() {
            return PointerDown::Ignored;
        }

        let tolerance = self.hit_tolerance / device_scale;
        if let Some(selected) = selection.selected().and_then(|id| document.element(id)) {
            if let Some(kind) = hit_test_handles(selected, point, tolerance, self.rotate_offset) {
                return self.handle_down(selection, kind, point);
            }
        }

        match document.element_at(point) {
            Some(element) => {
                let id = element.id().clone();
                selection.select(id.clone());
                self.transition(ManipulationState::Dragging {
                    id: id.clone(),
                    drag_start: point,
                });
                PointerDown::Started(id)
            }
            None => {
                selection.clear();
                PointerDown::Deselected
            }
        }
    }

    /// Pointer pressed on a handle of the selected element.
    ///
    /// Ignored when nothing is selected or a gesture is already active.
    pub fn handle_down(
        &mut self,
        selection: &Selection,
        kind: HandleKind,
        point: Point,
    ) -> PointerDown {
        if !self.state.is_idle() {
            return PointerDown::Ignored;
        }
        let Some(id) = selection.selected().cloned() else {
            log::debug!("Ignoring {:?} handle press without a selection", kind);
            return PointerDown::Ignored;
        };
        self.transition(match kind {
            HandleKind::Resize => ManipulationState::Resizing {
                id: id.clone(),
                drag_start: point,
            },
            HandleKind::Rotate => ManipulationState::Rotating { id: id.clone() },
        });
        PointerDown::Started(id)
    }

    /// Pointer moved to `point`. Returns whether the document changed.
    pub fn pointer_move(&mut self, document: &mut CompositionDocument, point: Point) -> bool {
        let Some(id) = self.state.target().cloned() else {
            return false;
        };
        let Some(element) = document.element_mut(&id) else {
            log::debug!("Gesture target {} disappeared", id);
            self.transition(ManipulationState::Idle);
            return false;
        };

        match &mut self.state {
            ManipulationState::Dragging { drag_start, .. } => {
                element.frame.translate(point - *drag_start);
                *drag_start = point;
            }
            ManipulationState::Resizing { drag_start, .. } => {
                let delta = point - *drag_start;
                let size = element.frame.size;
                element.frame.size = clamp_size(
                    Size::new(size.width + delta.x, size.height + delta.y),
                    self.min_size,
                );
                *drag_start = point;
            }
            ManipulationState::Rotating { .. } => {
                element.frame.rotation = bearing_degrees(element.frame.center(), point);
            }
            ManipulationState::Idle => return false,
        }
        true
    }

    /// Pointer released or left the canvas. Returns the gesture that ended.
    pub fn pointer_up(&mut self) -> ManipulationState {
        let ended = std::mem::take(&mut self.state);
        if !ended.is_idle() {
            log::debug!("Manipulation {} -> idle", ended.name());
        }
        ended
    }

    /// Abandon any gesture without touching the document.
    pub fn reset(&mut self) {
        self.transition(ManipulationState::Idle);
    }
}
