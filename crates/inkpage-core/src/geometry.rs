//! Virtual coordinate space and element geometry.
//!
//! All stored geometry lives in virtual device units. Conversion to on-screen
//! pixels happens only at render time through [`to_screen`], and pointer
//! input is brought back through [`to_virtual`].

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum width of a manipulable element, in virtual units.
pub const MIN_ELEMENT_WIDTH: f64 = 50.0;
/// Minimum height of a manipulable element, in virtual units.
pub const MIN_ELEMENT_HEIGHT: f64 = 30.0;

/// The size floor applied by resizing.
pub const MIN_ELEMENT_SIZE: Size = Size::new(MIN_ELEMENT_WIDTH, MIN_ELEMENT_HEIGHT);

fn check_scale(device_scale: f64) {
    debug_assert!(
        device_scale.is_finite() && device_scale > 0.0,
        "device scale must be finite and positive, got {device_scale}"
    );
}

/// Convert a point in virtual units to on-screen pixels.
pub fn to_screen(point: Point, device_scale: f64) -> Point {
    check_scale(device_scale);
    Point::new(point.x * device_scale, point.y * device_scale)
}

/// Convert an on-screen pixel position back to virtual units.
pub fn to_virtual(pixel: Point, device_scale: f64) -> Point {
    check_scale(device_scale);
    Point::new(pixel.x / device_scale, pixel.y / device_scale)
}

/// Affine form of [`to_screen`].
pub fn screen_transform(device_scale: f64) -> Affine {
    check_scale(device_scale);
    Affine::scale(device_scale)
}

/// Clamp a size component-wise to `floor`.
pub fn clamp_size(size: Size, floor: Size) -> Size {
    Size::new(size.width.max(floor.width), size.height.max(floor.height))
}

/// Placement of an element: top-left position, size and rotation.
///
/// Rotation is in degrees and turns the element about its own center after
/// translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementFrame {
    pub position: Point,
    pub size: Size,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl ElementFrame {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
        }
    }

    /// Geometric center in virtual units.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Axis-aligned box before rotation.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Transform from element-local coordinates (origin at the top-left
    /// corner, unrotated) to virtual units.
    pub fn transform(&self) -> Affine {
        Affine::rotate_about(self.rotation.to_radians(), self.center())
            * Affine::translate(self.position.to_vec2())
    }

    /// Map an element-local point into virtual units.
    pub fn local_to_virtual(&self, local: Point) -> Point {
        self.transform() * local
    }

    /// Rotation-aware containment test.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.transform().inverse() * point;
        local.x >= 0.0
            && local.y >= 0.0
            && local.x <= self.size.width
            && local.y <= self.size.height
    }

    /// Translate by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

impl Default for ElementFrame {
    fn default() -> Self {
        Self::new(Point::ZERO, MIN_ELEMENT_SIZE)
    }
}

/// Bearing of `point` seen from `center`, in degrees (`atan2` convention:
/// 0 points along +x, 90 along +y).
pub fn bearing_degrees(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x).to_degrees()
}
