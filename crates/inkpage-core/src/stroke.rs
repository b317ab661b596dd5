//! Freehand stroke capture and ink surfaces.

use crate::document::CompositionDocument;
use crate::elements::{DrawingPath, ElementId, SerializableColor};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Sink for ink output.
///
/// Capture emits one [`draw_segment`](Self::draw_segment) per pointer move
/// and one [`end_stroke`](Self::end_stroke) on commit. A full redraw is a
/// [`clear`](Self::clear) followed by one [`draw_stroke`](Self::draw_stroke)
/// per committed stroke, bottom to top.
pub trait InkSurface {
    /// Blank the surface, dropping committed and live ink.
    fn clear(&mut self);

    /// Paint one live segment of the stroke being captured.
    fn draw_segment(&mut self, from: Point, to: Point, color: SerializableColor, width: f64);

    /// Paint a committed stroke from its points.
    fn draw_stroke(&mut self, id: &ElementId, path: &DrawingPath);

    /// The live segments painted since the last commit now belong to `path`.
    fn end_stroke(&mut self, id: &ElementId, path: &DrawingPath);
}

/// A live segment painted during capture, in virtual units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkSegment {
    pub from: Point,
    pub to: Point,
    pub color: SerializableColor,
    pub width: f64,
}

/// Retained in-memory ink surface.
///
/// Keeps committed strokes in paint order plus the live segments of the
/// stroke in progress, so renderers can emit them as draw commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InkCanvas {
    strokes: Vec<(ElementId, DrawingPath)>,
    live: Vec<InkSegment>,
    clears: u64,
}

impl InkCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas fully redrawn from the strokes of `document`.
    pub fn from_document(document: &CompositionDocument) -> Self {
        let mut canvas = Self::new();
        redraw_all(&mut canvas, document);
        canvas
    }

    /// Committed strokes, bottom to top.
    pub fn strokes(&self) -> &[(ElementId, DrawingPath)] {
        &self.strokes
    }

    pub fn stroke(&self, id: &ElementId) -> Option<&DrawingPath> {
        self.strokes
            .iter()
            .find(|(stroke_id, _)| stroke_id == id)
            .map(|(_, path)| path)
    }

    /// Segments of the stroke being captured.
    pub fn live_segments(&self) -> &[InkSegment] {
        &self.live
    }

    /// How many times the surface was blanked.
    pub fn clear_count(&self) -> u64 {
        self.clears
    }
}

impl InkSurface for InkCanvas {
    fn clear(&mut self) {
        self.strokes.clear();
        self.live.clear();
        self.clears += 1;
    }

    fn draw_segment(&mut self, from: Point, to: Point, color: SerializableColor, width: f64) {
        self.live.push(InkSegment {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_stroke(&mut self, id: &ElementId, path: &DrawingPath) {
        log::trace!("Drawing stroke {} ({} points)", id, path.len());
        self.strokes.push((id.clone(), path.clone()));
    }

    fn end_stroke(&mut self, id: &ElementId, path: &DrawingPath) {
        self.live.clear();
        self.strokes.push((id.clone(), path.clone()));
    }
}

/// Clear `surface` and repaint every committed stroke of `document`.
pub fn redraw_all<S: InkSurface + ?Sized>(surface: &mut S, document: &CompositionDocument) {
    surface.clear();
    let mut count = 0;
    for (id, path) in document.strokes() {
        surface.draw_stroke(id, path);
        count += 1;
    }
    log::debug!("Redrew {} strokes", count);
}

/// Accumulates pointer samples into a stroke.
#[derive(Debug, Clone)]
pub struct StrokeCapture {
    points: Vec<Point>,
    capturing: bool,
    /// Ink colour for new strokes.
    pub color: SerializableColor,
    /// Ink width for new strokes, in virtual units.
    pub width: f64,
}

impl StrokeCapture {
    pub fn new(color: SerializableColor, width: f64) -> Self {
        Self {
            points: Vec::new(),
            capturing: false,
            color,
            width,
        }
    }

    /// Start a stroke at `point`.
    pub fn begin(&mut self, point: Point) {
        self.points.clear();
        self.points.push(point);
        self.capturing = true;
    }

    /// Append `point` and paint the segment from the previous sample.
    ///
    /// Returns `false` when no stroke is in progress.
    pub fn extend<S: InkSurface + ?Sized>(&mut self, point: Point, surface: &mut S) -> bool {
        if !self.capturing {
            return false;
        }
        if let Some(&previous) = self.points.last() {
            surface.draw_segment(previous, point, self.color, self.width);
        }
        self.points.push(point);
        true
    }

    /// Finish the stroke in progress.
    ///
    /// Returns `None` when nothing was in progress or when fewer than two
    /// samples were captured, since such a path paints nothing.
    pub fn commit(&mut self) -> Option<DrawingPath> {
        if !self.capturing {
            return None;
        }
        self.capturing = false;
        let points = std::mem::take(&mut self.points);
        if points.len() < 2 {
            log::debug!("Discarding stroke with {} point(s)", points.len());
            return None;
        }
        Some(DrawingPath::new(points, self.color, self.width))
    }

    /// Drop the stroke in progress. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was_capturing = self.capturing;
        self.capturing = false;
        self.points.clear();
        was_capturing
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Samples of the stroke in progress.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Default for StrokeCapture {
    fn default() -> Self {
        Self::new(SerializableColor::white(), crate::config::DEFAULT_INK_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, ElementPatch};

    #[test]
    fn test_capture_emits_one_segment_per_move() {
        let mut canvas = InkCanvas::new();
        let mut capture = StrokeCapture::default();
        capture.begin(Point::new(0.0, 0.0));
        assert!(capture.extend(Point::new(10.0, 0.0), &mut canvas));
        assert!(capture.extend(Point::new(10.0, 10.0), &mut canvas));
        assert_eq!(canvas.live_segments().len(), 2);
        assert_eq!(canvas.live_segments()[1].from, Point::new(10.0, 0.0));

        let path = capture.commit().unwrap();
        assert_eq!(path.len(), 3);
        assert!(!capture.is_capturing());
        assert!(capture.points().is_empty());
    }

    #[test]
    fn test_single_point_stroke_is_discarded() {
        let mut capture = StrokeCapture::default();
        capture.begin(Point::new(5.0, 5.0));
        assert!(capture.commit().is_none());
        assert!(capture.commit().is_none());
    }

    #[test]
    fn test_extend_without_begin_is_ignored() {
        let mut canvas = InkCanvas::new();
        let mut capture = StrokeCapture::default();
        assert!(!capture.extend(Point::new(1.0, 1.0), &mut canvas));
        assert!(canvas.live_segments().is_empty());
    }

    #[test]
    fn test_end_stroke_moves_live_ink_into_strokes() {
        let mut canvas = InkCanvas::new();
        let mut capture = StrokeCapture::default();
        capture.begin(Point::ZERO);
        capture.extend(Point::new(4.0, 4.0), &mut canvas);
        let path = capture.commit().unwrap();
        let id = ElementId::from("s1");
        canvas.end_stroke(&id, &path);
        assert!(canvas.live_segments().is_empty());
        assert_eq!(canvas.stroke(&id), Some(&path));
    }

    #[test]
    fn test_redraw_all_repaints_only_strokes() {
        let mut document = CompositionDocument::new();
        document
            .add_element(ElementKind::Text, Some(Point::new(1.0, 1.0)))
            .unwrap();
        let path = DrawingPath::new(
            vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
            SerializableColor::white(),
            3.0,
        );
        let id = document.push_stroke(path.clone());

        let mut canvas = InkCanvas::new();
        canvas.draw_segment(Point::ZERO, Point::new(1.0, 1.0), SerializableColor::black(), 1.0);
        redraw_all(&mut canvas, &document);
        assert!(canvas.live_segments().is_empty());
        assert_eq!(canvas.strokes(), &[(id, path)]);
        assert_eq!(canvas.clear_count(), 1);
    }

    #[test]
    fn test_committed_stroke_content_cannot_be_patched() {
        let mut document = CompositionDocument::new();
        let path = DrawingPath::new(
            vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
            SerializableColor::white(),
            3.0,
        );
        let id = document.push_stroke(path.clone());
        assert!(
            document
                .update_element(&id, &ElementPatch::content("[]"), crate::geometry::MIN_ELEMENT_SIZE)
                .is_err()
        );
        assert_eq!(document.element(&id).and_then(|e| e.as_stroke()), Some(&path));
    }
}
