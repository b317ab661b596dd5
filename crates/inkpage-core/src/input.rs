//! Pointer input for editing sessions.

use crate::geometry::to_virtual;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are on-screen pixels relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The pointer left the canvas.
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(*position),
            PointerEvent::Leave => None,
        }
    }

    /// Position converted to virtual units.
    pub fn virtual_position(&self, device_scale: f64) -> Option<Point> {
        self.position().map(|p| to_virtual(p, device_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_position() {
        let event = PointerEvent::Move {
            position: Point::new(50.0, 100.0),
        };
        assert_eq!(event.virtual_position(0.5), Some(Point::new(100.0, 200.0)));
        assert_eq!(PointerEvent::Leave.virtual_position(1.0), None);
    }
}
