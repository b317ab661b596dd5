//! Public viewer for published pages.

use crate::display::DisplayList;
use crate::frame::DeviceFrame;
use crate::renderer::{RenderContext, RenderError, RenderResult, Renderer, build_display_list};
use inkpage_core::{CompositionDocument, InkCanvas, LoadReport, StoredPage};

/// Renders a stored page for visitors, on the fixed phone frame.
///
/// Built straight from the stored record with no editor session behind it.
#[derive(Debug, Clone)]
pub struct PublicRenderer {
    page_id: String,
    document: CompositionDocument,
    ink: InkCanvas,
}

impl PublicRenderer {
    /// Load a published page. Unpublished pages are refused.
    pub fn from_page(page: &StoredPage) -> RenderResult<(Self, LoadReport)> {
        if !page.published {
            return Err(RenderError::Unpublished(page.id.clone()));
        }
        let (document, report) = page.to_document();
        if !report.is_clean() {
            log::warn!(
                "Public page {} skipped {} element(s)",
                page.id,
                report.rejected.len()
            );
        }
        let ink = InkCanvas::from_document(&document);
        Ok((
            Self {
                page_id: page.id.clone(),
                document,
                ink,
            },
            report,
        ))
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn title(&self) -> &str {
        &self.document.metadata.title
    }

    pub fn description(&self) -> Option<&str> {
        self.document.metadata.description.as_deref()
    }
}

impl Renderer for PublicRenderer {
    fn device_frame(&self) -> DeviceFrame {
        DeviceFrame::PUBLIC
    }

    fn document(&self) -> &CompositionDocument {
        &self.document
    }

    fn render(&self) -> DisplayList {
        build_display_list(&RenderContext::new(
            &self.document,
            &self.ink,
            DeviceFrame::PUBLIC,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DrawCommand;
    use inkpage_core::{ElementKind, ElementPatch, SerializableColor};
    use kurbo::{Point, Size};

    fn page(published: bool) -> StoredPage {
        let mut doc = CompositionDocument::new();
        doc.metadata.title = "Mina's card".to_string();
        doc.metadata.description = Some("Scan me".to_string());
        let id = doc
            .add_element(ElementKind::Link, Some(Point::new(20.0, 500.0)))
            .unwrap()
            .id()
            .clone();
        doc.update_element(
            &id,
            &ElementPatch::content("https://example.com/portfolio/2026"),
            Size::new(50.0, 30.0),
        )
        .unwrap();
        let mut page = StoredPage::from_document("card", &doc);
        page.published = published;
        page
    }

    #[test]
    fn test_unpublished_page_is_refused() {
        let result = PublicRenderer::from_page(&page(false));
        assert!(matches!(result, Err(RenderError::Unpublished(id)) if id == "card"));
    }

    #[test]
    fn test_published_page_renders_on_phone_frame() {
        let (renderer, report) = PublicRenderer::from_page(&page(true)).unwrap();
        assert!(report.is_clean());
        assert_eq!(renderer.title(), "Mina's card");
        assert_eq!(renderer.description(), Some("Scan me"));
        assert_eq!(renderer.page_id(), "card");

        let list = renderer.render();
        assert_eq!(list.size, DeviceFrame::PUBLIC.screen_size());
        let label = list.iter().find_map(|c| match c {
            DrawCommand::LinkButton { label, .. } => Some(label.as_str()),
            _ => None,
        });
        assert_eq!(label, Some("https://example.com/..."));
    }

    #[test]
    fn test_bad_elements_are_skipped() {
        let json = r##"{
            "id": "p",
            "title": "Broken",
            "published": true,
            "document": {
                "background": {"type": "color", "value": "#112233"},
                "elements": [
                    {"id": "a", "type": "sticker", "content": "?"},
                    {"id": "b", "type": "drawing", "content": "not json"},
                    {"id": "c", "type": "text", "content": "ok", "x": 10, "y": 10}
                ]
            }
        }"##;
        let page = StoredPage::from_json(json).unwrap();
        let (renderer, report) = PublicRenderer::from_page(&page).unwrap();
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(renderer.document().len(), 1);
        assert_eq!(
            SerializableColor::from(renderer.clear_color()),
            SerializableColor::new(0x11, 0x22, 0x33, 0xff)
        );
    }
}
