//! Renderer for the editor canvas.

use crate::display::DisplayList;
use crate::frame::DeviceFrame;
use crate::renderer::{RenderContext, RenderMode, Renderer, build_display_list};
use inkpage_core::{CompositionDocument, EditorSession};

/// Draws a live editing session: content plus the selection outline, the
/// handles of the selected element and the stroke being captured.
pub struct EditableRenderer<'a> {
    session: &'a EditorSession,
    frame: DeviceFrame,
}

impl<'a> EditableRenderer<'a> {
    pub fn new(session: &'a EditorSession, frame: DeviceFrame) -> Self {
        Self { session, frame }
    }

    pub fn session(&self) -> &EditorSession {
        self.session
    }
}

impl Renderer for EditableRenderer<'_> {
    fn device_frame(&self) -> DeviceFrame {
        self.frame
    }

    fn document(&self) -> &CompositionDocument {
        self.session.document()
    }

    fn render(&self) -> DisplayList {
        let live_ink = if self.session.is_drawing_enabled() {
            self.session.ink().live_segments()
        } else {
            &[]
        };
        let ctx = RenderContext::new(self.session.document(), self.session.ink(), self.frame)
            .with_mode(RenderMode::Interactive)
            .with_selection(self.session.selection().selected())
            .with_live_ink(live_ink)
            .with_rotate_handle_offset(self.session.config().rotate_handle_offset);
        build_display_list(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DrawCommand;
    use inkpage_core::{ElementKind, HandleKind, PointerEvent};
    use kurbo::Point;

    fn handles(list: &DisplayList) -> Vec<HandleKind> {
        list.iter()
            .filter_map(|c| match c {
                DrawCommand::Handle { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_handles_only_for_selection() {
        let mut session = EditorSession::default();
        let first = session.add_element(ElementKind::Text, None).unwrap();
        let second = session
            .add_element(ElementKind::Link, Some(Point::new(100.0, 300.0)))
            .unwrap();

        let list = EditableRenderer::new(&session, DeviceFrame::PUBLIC).render();
        assert_eq!(handles(&list), vec![HandleKind::Resize, HandleKind::Rotate]);
        assert!(list.iter().all(|c| match c {
            DrawCommand::Handle { id, .. } | DrawCommand::SelectionOutline { id, .. } => {
                *id == second
            }
            _ => true,
        }));
        assert!(first != second);
    }

    #[test]
    fn test_no_handles_without_selection() {
        let mut session = EditorSession::default();
        session.add_element(ElementKind::Image, None).unwrap();
        session.set_drawing_enabled(true);

        let list = EditableRenderer::new(&session, DeviceFrame::PUBLIC).render();
        assert!(handles(&list).is_empty());
        assert!(
            !list
                .iter()
                .any(|c| matches!(c, DrawCommand::SelectionOutline { .. }))
        );
    }

    #[test]
    fn test_live_ink_while_drawing() {
        let mut session = EditorSession::default();
        session.set_drawing_enabled(true);
        session
            .handle_pointer(
                PointerEvent::Down {
                    position: Point::new(10.0, 10.0),
                },
                1.0,
            )
            .unwrap();
        session
            .handle_pointer(
                PointerEvent::Move {
                    position: Point::new(20.0, 15.0),
                },
                1.0,
            )
            .unwrap();

        let list = EditableRenderer::new(&session, DeviceFrame::PUBLIC).render();
        let live = list
            .iter()
            .filter(|c| matches!(c, DrawCommand::LiveInk { .. }))
            .count();
        assert_eq!(live, 1);
        assert!(list.content_commands().len() < list.len());

        session
            .handle_pointer(
                PointerEvent::Up {
                    position: Point::new(20.0, 15.0),
                },
                1.0,
            )
            .unwrap();
        let list = EditableRenderer::new(&session, DeviceFrame::PUBLIC).render();
        assert!(!list.iter().any(|c| matches!(c, DrawCommand::LiveInk { .. })));
        assert!(list.iter().any(|c| matches!(c, DrawCommand::Ink { .. })));
    }

    #[test]
    fn test_rotate_handle_follows_config() {
        let mut session = EditorSession::default();
        session
            .add_element(ElementKind::Text, Some(Point::new(100.0, 100.0)))
            .unwrap();

        let list = EditableRenderer::new(&session, DeviceFrame::PUBLIC).render();
        let rotate = list.iter().find_map(|c| match c {
            DrawCommand::Handle {
                kind: HandleKind::Rotate,
                center,
                ..
            } => Some(*center),
            _ => None,
        });
        let offset = session.config().rotate_handle_offset;
        assert_eq!(rotate.map(|p| p.y), Some(100.0 - offset));
    }
}
