//! Freehand ink paths.

use super::SerializableColor;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// One sample of a persisted drawing, in virtual units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PathPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PathPoint> for Point {
    fn from(p: PathPoint) -> Self {
        Point::new(p.x, p.y)
    }
}

/// A committed freehand stroke.
///
/// There is no API to add or move points: once built, a path stays as it
/// was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPath {
    points: Vec<Point>,
    color: SerializableColor,
    /// Line width in virtual units.
    width: f64,
}

impl DrawingPath {
    pub fn new(points: Vec<Point>, color: SerializableColor, width: f64) -> Self {
        Self {
            points,
            color,
            width,
        }
    }

    /// Decode the JSON point array stored in a drawing element's content.
    pub fn from_json_points(
        content: &str,
        color: SerializableColor,
        width: f64,
    ) -> Result<Self, serde_json::Error> {
        let samples: Vec<PathPoint> = serde_json::from_str(content)?;
        Ok(Self::new(
            samples.into_iter().map(Point::from).collect(),
            color,
            width,
        ))
    }

    /// Encode the points as the JSON array stored in element content.
    pub fn to_json_points(&self) -> String {
        let samples: Vec<PathPoint> = self.points.iter().copied().map(PathPoint::from).collect();
        // A Vec of plain f64 pairs always serializes.
        serde_json::to_string(&samples).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the path paints anything (two or more samples).
    pub fn is_drawable(&self) -> bool {
        self.points.len() > 1
    }

    /// Bounding box of the samples.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }
}

impl Default for DrawingPath {
    fn default() -> Self {
        Self::new(Vec::new(), SerializableColor::white(), 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DrawingPath {
        DrawingPath::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 50.0),
                Point::new(50.0, 100.0),
            ],
            SerializableColor::white(),
            3.0,
        )
    }

    #[test]
    fn test_bounds() {
        let bounds = sample().bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_bounds() {
        assert_eq!(DrawingPath::default().bounds(), Rect::ZERO);
    }

    #[test]
    fn test_json_points_round_trip() {
        let path = sample();
        let json = path.to_json_points();
        assert_eq!(json, r#"[{"x":0.0,"y":0.0},{"x":100.0,"y":50.0},{"x":50.0,"y":100.0}]"#);
        let decoded = DrawingPath::from_json_points(&json, path.color(), path.width()).unwrap();
        assert_eq!(decoded, path);
    }

    #[test]
    fn test_malformed_json_points() {
        assert!(DrawingPath::from_json_points("not json", SerializableColor::white(), 3.0).is_err());
        assert!(
            DrawingPath::from_json_points(r#"[{"x":1}]"#, SerializableColor::white(), 3.0).is_err()
        );
    }

    #[test]
    fn test_drawable_needs_two_points() {
        assert!(sample().is_drawable());
        let single = DrawingPath::new(vec![Point::ZERO], SerializableColor::black(), 1.0);
        assert!(!single.is_drawable());
    }
}
