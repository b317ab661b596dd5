//! Editing session: one document plus everything the editor tracks around it.

use crate::background::{Background, BackgroundKind, BackgroundPalette};
use crate::config::EditorConfig;
use crate::document::{CompositionDocument, LoadReport};
use crate::elements::{Element, ElementId, ElementKind, ElementPatch, SerializableColor};
use crate::error::{CanvasError, CanvasResult};
use crate::input::PointerEvent;
use crate::manipulation::{ManipulationState, Manipulator, PointerDown};
use crate::selection::Selection;
use crate::storage::{Storage, StorageResult, StoredPage};
use crate::stroke::{InkCanvas, InkSurface, StrokeCapture, redraw_all};
use kurbo::Point;

/// The editor's state for one page.
///
/// Owns the document, the single selection, the drawing-mode flag, the ink
/// surface and the gesture machine. Drawing mode and manipulation gestures
/// exclude each other: while drawing is enabled all pointer input goes to
/// stroke capture.
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: CompositionDocument,
    selection: Selection,
    drawing_enabled: bool,
    palette: BackgroundPalette,
    ink: InkCanvas,
    capture: StrokeCapture,
    manipulator: Manipulator,
    config: EditorConfig,
    page_id: Option<String>,
    published: bool,
    ready: bool,
}

impl EditorSession {
    /// A ready session on an empty document.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(CompositionDocument::new(), config)
    }

    /// A ready session on an existing document.
    pub fn with_document(document: CompositionDocument, config: EditorConfig) -> Self {
        let ink = InkCanvas::from_document(&document);
        Self {
            palette: BackgroundPalette::from_background(&document.background),
            capture: StrokeCapture::new(config.ink_color, config.ink_width),
            manipulator: Manipulator::new(&config),
            document,
            selection: Selection::default(),
            drawing_enabled: false,
            ink,
            config,
            page_id: None,
            published: false,
            ready: true,
        }
    }

    /// A session waiting for its page; gestures are rejected until
    /// [`finish_loading`](Self::finish_loading).
    pub fn loading(config: EditorConfig) -> Self {
        let mut session = Self::new(config);
        session.ready = false;
        session
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Install a loaded page and fully redraw its ink.
    pub fn finish_loading(&mut self, page: &StoredPage) -> LoadReport {
        let (document, report) = page.to_document();
        if !report.is_clean() {
            log::warn!(
                "Page {} loaded with {} rejected and {} renamed element(s)",
                page.id,
                report.rejected.len(),
                report.renamed.len()
            );
        }
        self.palette = BackgroundPalette::from_background(&document.background);
        self.document = document;
        self.selection.clear();
        self.manipulator.reset();
        self.capture.cancel();
        self.page_id = (!page.id.is_empty()).then(|| page.id.clone());
        self.published = page.published;
        redraw_all(&mut self.ink, &self.document);
        self.ready = true;
        report
    }

    fn ensure_ready(&self) -> CanvasResult<()> {
        if self.ready {
            Ok(())
        } else {
            Err(CanvasError::NotReady)
        }
    }

    pub fn document(&self) -> &CompositionDocument {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected element, if it still exists.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.selected().and_then(|id| self.document.element(id))
    }

    pub fn ink(&self) -> &InkCanvas {
        &self.ink
    }

    pub fn capture(&self) -> &StrokeCapture {
        &self.capture
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn palette(&self) -> &BackgroundPalette {
        &self.palette
    }

    pub fn manipulation(&self) -> &ManipulationState {
        self.manipulator.state()
    }

    pub fn is_drawing_enabled(&self) -> bool {
        self.drawing_enabled
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    /// Toggle drawing mode.
    ///
    /// Enabling ends any gesture and clears the selection. Disabling drops a
    /// stroke still in progress.
    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        if enabled == self.drawing_enabled {
            return;
        }
        if enabled {
            self.manipulator.reset();
            self.selection.clear();
        } else if self.capture.cancel() {
            redraw_all(&mut self.ink, &self.document);
        }
        log::debug!("Drawing mode {}", if enabled { "on" } else { "off" });
        self.drawing_enabled = enabled;
    }

    /// Ink used for new strokes.
    pub fn set_ink(&mut self, color: SerializableColor, width: f64) {
        self.capture.color = color;
        if width.is_finite() && width > 0.0 {
            self.capture.width = width;
        }
    }

    /// Route a pointer event (screen pixels) to stroke capture or to the
    /// gesture machine. Returns whether anything visible changed.
    pub fn handle_pointer(&mut self, event: PointerEvent, device_scale: f64) -> CanvasResult<bool> {
        self.ensure_ready()?;
        let point = event.virtual_position(device_scale);

        if self.drawing_enabled {
            return Ok(match (event, point) {
                // A second Down keeps the stroke already being captured.
                (PointerEvent::Down { .. }, _) if self.capture.is_capturing() => false,
                (PointerEvent::Down { .. }, Some(point)) => {
                    self.capture.begin(point);
                    false
                }
                (PointerEvent::Move { .. }, Some(point)) => self.capture.extend(point, &mut self.ink),
                _ => self.commit_stroke(),
            });
        }

        Ok(match (event, point) {
            (PointerEvent::Down { .. }, Some(point)) => {
                let outcome = self.manipulator.pointer_down(
                    &self.document,
                    &mut self.selection,
                    point,
                    device_scale,
                );
                !matches!(outcome, PointerDown::Ignored)
            }
            (PointerEvent::Move { .. }, Some(point)) => {
                self.manipulator.pointer_move(&mut self.document, point)
            }
            _ => {
                self.manipulator.pointer_up();
                false
            }
        })
    }

    fn commit_stroke(&mut self) -> bool {
        let had_live_ink = !self.ink.live_segments().is_empty();
        match self.capture.commit() {
            Some(path) => {
                let id = self.document.push_stroke(path.clone());
                self.ink.end_stroke(&id, &path);
                log::debug!("Committed stroke {} with {} points", id, path.len());
                true
            }
            None => had_live_ink,
        }
    }

    /// Add an element with its defaults. It is selected unless drawing mode
    /// is on.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        position: Option<Point>,
    ) -> CanvasResult<ElementId> {
        self.ensure_ready()?;
        let position = position.unwrap_or(self.config.default_position);
        let id = self.document.add_element(kind, Some(position))?.id().clone();
        if !self.drawing_enabled {
            self.selection.select(id.clone());
        }
        Ok(id)
    }

    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> CanvasResult<()> {
        self.ensure_ready()?;
        self.document
            .update_element(id, patch, self.config.min_element_size)
    }

    /// Patch the selected element, if any.
    pub fn update_selected(&mut self, patch: &ElementPatch) -> CanvasResult<bool> {
        match self.selection.selected().cloned() {
            Some(id) => self.update_element(&id, patch).map(|()| true),
            None => Ok(false),
        }
    }

    /// Embed an uploaded blob into an image or video element.
    pub fn attach_media(
        &mut self,
        id: &ElementId,
        data: &[u8],
        mime: Option<&str>,
    ) -> CanvasResult<()> {
        self.ensure_ready()?;
        self.document.attach_media(id, data, mime)
    }

    /// Remove an element. Clears the selection if it pointed there and
    /// redraws the ink when a stroke went away.
    pub fn remove_element(&mut self, id: &ElementId) -> CanvasResult<Element> {
        self.ensure_ready()?;
        let removed = self.document.remove_element(id)?;
        if self.selection.is_selected(id) {
            self.selection.clear();
        }
        if !removed.is_manipulable() {
            redraw_all(&mut self.ink, &self.document);
        }
        Ok(removed)
    }

    /// Remove the selected element, if any.
    pub fn delete_selected(&mut self) -> CanvasResult<Option<Element>> {
        match self.selection.selected().cloned() {
            Some(id) => self.remove_element(&id).map(Some),
            None => Ok(None),
        }
    }

    /// Remove every stroke and blank the ink surface.
    pub fn clear_strokes(&mut self) -> CanvasResult<usize> {
        self.ensure_ready()?;
        self.capture.cancel();
        let removed = self.document.clear_strokes();
        self.ink.clear();
        log::debug!("Cleared {} stroke(s)", removed);
        Ok(removed)
    }

    pub fn bring_to_front(&mut self, id: &ElementId) -> CanvasResult<()> {
        self.ensure_ready()?;
        self.document.bring_to_front(id)?;
        redraw_all(&mut self.ink, &self.document);
        Ok(())
    }

    pub fn send_to_back(&mut self, id: &ElementId) -> CanvasResult<()> {
        self.ensure_ready()?;
        self.document.send_to_back(id)?;
        redraw_all(&mut self.ink, &self.document);
        Ok(())
    }

    /// Replace the background and remember it for its type.
    pub fn set_background(&mut self, background: Background) {
        self.palette.remember(background.clone());
        self.document.set_background(background);
    }

    /// Switch background type, restoring the last value used for it.
    pub fn switch_background(&mut self, kind: BackgroundKind) {
        self.palette.switch_to(kind);
        self.document.set_background(self.palette.current());
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document.metadata.title = title.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.document.metadata.description = description;
    }

    /// Snapshot the session as a stored page.
    pub fn to_stored_page(&self, id: &str) -> StoredPage {
        let mut page = StoredPage::from_document(id, &self.document);
        page.published = self.published;
        page
    }

    /// Save the current document. The session stays editable while the
    /// save is pending; a failed save leaves it untouched.
    pub async fn save_to(&mut self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        let page = self.to_stored_page(id);
        storage.save(id, &page).await?;
        self.page_id = Some(id.to_string());
        log::debug!("Saved page {} ({} elements)", id, page.document.elements.len());
        Ok(())
    }

    /// Load a page into a fresh session.
    pub async fn load_from(
        storage: &dyn Storage,
        id: &str,
        config: EditorConfig,
    ) -> StorageResult<(Self, LoadReport)> {
        let mut session = Self::loading(config);
        let page = storage.load(id).await?;
        let report = session.finish_loading(&page);
        Ok((session, report))
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementContent;
    use crate::storage::MemoryStorage;
    use kurbo::Size;
    use pollster::block_on;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
        }
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
        }
    }

    fn draw(session: &mut EditorSession, points: &[(f64, f64)]) {
        let (x, y) = points[0];
        session.handle_pointer(down(x, y), 1.0).unwrap();
        for &(x, y) in &points[1..] {
            session.handle_pointer(mv(x, y), 1.0).unwrap();
        }
        let (x, y) = points[points.len() - 1];
        session.handle_pointer(up(x, y), 1.0).unwrap();
    }

    #[test]
    fn test_add_element_selects_it() {
        let mut session = EditorSession::default();
        let id = session.add_element(ElementKind::Image, None).unwrap();
        assert!(session.selection().is_selected(&id));
        assert_eq!(
            session.selected_element().unwrap().frame.position,
            Point::new(50.0, 50.0)
        );
    }

    #[test]
    fn test_add_element_while_drawing_keeps_selection_empty() {
        let mut session = EditorSession::default();
        session.set_drawing_enabled(true);
        let id = session.add_element(ElementKind::Text, None).unwrap();
        assert!(session.selection().is_empty());
        assert!(session.document().element(&id).is_some());
    }

    #[test]
    fn test_leave_ends_drag() {
        let mut session = EditorSession::default();
        let id = session
            .add_element(ElementKind::Text, Some(Point::new(150.0, 150.0)))
            .unwrap();
        session.handle_pointer(down(160.0, 160.0), 1.0).unwrap();
        assert!(!session.manipulation().is_idle());

        session.handle_pointer(PointerEvent::Leave, 1.0).unwrap();
        assert!(session.manipulation().is_idle());
        assert!(!session.handle_pointer(mv(210.0, 190.0), 1.0).unwrap());
        assert_eq!(
            session.document().element(&id).unwrap().frame.position,
            Point::new(150.0, 150.0)
        );
    }

    #[test]
    fn test_leave_commits_stroke() {
        let mut session = EditorSession::default();
        session.set_drawing_enabled(true);
        session.handle_pointer(down(0.0, 0.0), 1.0).unwrap();
        session.handle_pointer(mv(20.0, 10.0), 1.0).unwrap();
        assert!(session.handle_pointer(PointerEvent::Leave, 1.0).unwrap());

        assert_eq!(session.document().strokes().count(), 1);
        assert_eq!(session.ink().strokes().len(), 1);
        assert!(session.ink().live_segments().is_empty());
        assert!(!session.capture().is_capturing());
    }

    #[test]
    fn test_second_down_while_drawing_keeps_stroke() {
        let mut session = EditorSession::default();
        session.set_drawing_enabled(true);
        session.handle_pointer(down(0.0, 0.0), 1.0).unwrap();
        session.handle_pointer(mv(20.0, 10.0), 1.0).unwrap();

        assert!(!session.handle_pointer(down(90.0, 90.0), 1.0).unwrap());
        assert_eq!(session.capture().points().len(), 2);
        assert_eq!(session.ink().live_segments().len(), 1);

        session.handle_pointer(mv(30.0, 30.0), 1.0).unwrap();
        session.handle_pointer(up(30.0, 30.0), 1.0).unwrap();
        let (_, path) = &session.ink().strokes()[0];
        assert_eq!(path.points()[0], Point::ZERO);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_drag_scenario_with_device_scale() {
        let mut session = EditorSession::default();
        let id = session
            .add_element(ElementKind::Text, Some(Point::new(150.0, 150.0)))
            .unwrap();
        // Same gesture on a 0.5-scale frame: screen pixels are halved.
        session.handle_pointer(down(80.0, 80.0), 0.5).unwrap();
        session.handle_pointer(mv(105.0, 95.0), 0.5).unwrap();
        session.handle_pointer(up(105.0, 95.0), 0.5).unwrap();
        let element = session.document().element(&id).unwrap();
        assert_eq!(element.frame.position, Point::new(200.0, 180.0));
        assert_eq!(element.frame.size, Size::new(200.0, 50.0));
    }

    #[test]
    fn test_drawing_mode_owns_pointer_input() {
        let mut session = EditorSession::default();
        let id = session
            .add_element(ElementKind::Text, Some(Point::new(0.0, 0.0)))
            .unwrap();
        session.set_drawing_enabled(true);
        assert!(session.selection().is_empty());

        draw(&mut session, &[(10.0, 10.0), (40.0, 20.0), (60.0, 30.0)]);
        assert_eq!(session.document().element(&id).unwrap().frame.position, Point::ZERO);
        assert!(session.manipulation().is_idle());
        assert_eq!(session.document().strokes().count(), 1);
        assert_eq!(session.ink().strokes().len(), 1);
        assert!(session.ink().live_segments().is_empty());
    }

    #[test]
    fn test_tap_while_drawing_commits_nothing() {
        let mut session = EditorSession::default();
        session.set_drawing_enabled(true);
        session.handle_pointer(down(500.0, 500.0), 1.0).unwrap();
        session.handle_pointer(up(500.0, 500.0), 1.0).unwrap();
        assert_eq!(session.document().strokes().count(), 0);
    }

    #[test]
    fn test_disabling_drawing_drops_stroke_in_progress() {
        let mut session = EditorSession::default();
        session.set_drawing_enabled(true);
        session.handle_pointer(down(0.0, 0.0), 1.0).unwrap();
        session.handle_pointer(mv(5.0, 5.0), 1.0).unwrap();
        session.set_drawing_enabled(false);
        assert!(session.ink().live_segments().is_empty());
        assert_eq!(session.document().strokes().count(), 0);
    }

    #[test]
    fn test_remove_clears_selection_and_redraws_ink() {
        let mut session = EditorSession::default();
        session.set_drawing_enabled(true);
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        draw(&mut session, &[(20.0, 20.0), (30.0, 30.0)]);
        session.set_drawing_enabled(false);
        let clears = session.ink().clear_count();

        let stroke_id = session.document().strokes().next().map(|(id, _)| id.clone()).unwrap();
        session.remove_element(&stroke_id).unwrap();
        assert_eq!(session.ink().strokes().len(), 1);
        assert_eq!(session.ink().clear_count(), clears + 1);

        let text = session.add_element(ElementKind::Text, None).unwrap();
        session.remove_element(&text).unwrap();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_clear_strokes_keeps_other_elements() {
        let mut session = EditorSession::default();
        session.add_element(ElementKind::Link, None).unwrap();
        session.set_drawing_enabled(true);
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(session.clear_strokes().unwrap(), 1);
        assert_eq!(session.document().len(), 1);
        assert!(session.ink().strokes().is_empty());
    }

    #[test]
    fn test_loading_session_rejects_gestures() {
        let mut session = EditorSession::loading(EditorConfig::default());
        assert!(!session.is_ready());
        assert!(matches!(
            session.handle_pointer(down(1.0, 1.0), 1.0),
            Err(CanvasError::NotReady)
        ));
        assert!(matches!(
            session.add_element(ElementKind::Text, None),
            Err(CanvasError::NotReady)
        ));
    }

    #[test]
    fn test_background_switch_restores_previous_value() {
        let mut session = EditorSession::default();
        session.set_background(Background::Color(SerializableColor::white()));
        session.switch_background(BackgroundKind::Gradient);
        assert_eq!(session.document().background, Background::default());
        session.switch_background(BackgroundKind::Color);
        assert_eq!(
            session.document().background,
            Background::Color(SerializableColor::white())
        );
    }

    #[test]
    fn test_selected_element_edits() {
        let mut session = EditorSession::default();
        assert!(!session.update_selected(&ElementPatch::content("x")).unwrap());
        assert!(session.delete_selected().unwrap().is_none());

        let id = session.add_element(ElementKind::Link, None).unwrap();
        assert!(
            session
                .update_selected(&ElementPatch::content("https://x.test"))
                .unwrap()
        );
        let removed = session.delete_selected().unwrap().unwrap();
        assert_eq!(removed.id(), &id);
        assert_eq!(removed.content, ElementContent::Link("https://x.test".to_string()));
        assert!(session.selection().is_empty());
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_ink_settings_apply_to_next_stroke() {
        let mut session = EditorSession::default();
        let red = SerializableColor::new(255, 0, 0, 255);
        session.set_ink(red, 0.0);
        session.set_ink(red, 6.0);
        session.set_drawing_enabled(true);
        draw(&mut session, &[(0.0, 0.0), (30.0, 30.0)]);

        let (_, path) = &session.ink().strokes()[0];
        assert_eq!(path.color(), red);
        assert_eq!(path.width(), 6.0);
    }

    #[test]
    fn test_published_flag_and_metadata_reach_stored_page() {
        let mut session = EditorSession::default();
        assert!(!session.is_published());
        session.set_published(true);
        session.set_description(Some("Find me here".to_string()));

        let page = session.to_stored_page("me");
        assert!(page.published);
        assert_eq!(page.description.as_deref(), Some("Find me here"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let storage = MemoryStorage::new();
        let mut session = EditorSession::default();
        session.set_title("Profile");
        session.add_element(ElementKind::Text, Some(Point::new(10.0, 10.0))).unwrap();
        session.set_drawing_enabled(true);
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]);
        block_on(session.save_to(&storage, "page-1")).unwrap();
        assert_eq!(session.page_id(), Some("page-1"));

        let (loaded, report) =
            block_on(EditorSession::load_from(&storage, "page-1", EditorConfig::default())).unwrap();
        assert!(report.is_clean());
        assert!(loaded.is_ready());
        assert_eq!(loaded.document().metadata.title, "Profile");
        assert_eq!(loaded.document().elements(), session.document().elements());
        assert_eq!(loaded.ink().strokes(), session.ink().strokes());
    }

    #[test]
    fn test_load_missing_page_fails() {
        let storage = MemoryStorage::new();
        let result = block_on(EditorSession::load_from(&storage, "nope", EditorConfig::default()));
        assert!(result.is_err());
    }
}
