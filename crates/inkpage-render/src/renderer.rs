//! Shared display-list builder and the renderer trait.

use crate::display::{DisplayList, DrawCommand, ScreenFrame, link_label};
use crate::frame::DeviceFrame;
use inkpage_core::config::ROTATE_HANDLE_OFFSET;
use inkpage_core::geometry::{ElementFrame, to_screen};
use inkpage_core::selection::{HANDLE_SIZE, get_handles};
use inkpage_core::{
    Background, CompositionDocument, Element, ElementContent, ElementId, InkCanvas, InkSegment,
};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Page {0} is not published")]
    Unpublished(String),
    #[error("Invalid device frame {width}x{height} @ {scale}")]
    InvalidFrame { width: f64, height: f64, scale: f64 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Whether editor affordances are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Editor: selection outline, handles and live ink.
    Interactive,
    /// Preview and public viewer.
    #[default]
    ReadOnly,
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    pub document: &'a CompositionDocument,
    /// Committed ink, as painted on the ink surface.
    pub ink: &'a InkCanvas,
    pub frame: DeviceFrame,
    pub mode: RenderMode,
    /// Selected element (interactive mode only).
    pub selection: Option<&'a ElementId>,
    /// Segments of the stroke being captured (interactive mode only).
    pub live_ink: &'a [InkSegment],
    /// Rotate handle distance above the top edge, in virtual units.
    pub rotate_handle_offset: f64,
}

impl<'a> RenderContext<'a> {
    pub fn new(document: &'a CompositionDocument, ink: &'a InkCanvas, frame: DeviceFrame) -> Self {
        Self {
            document,
            ink,
            frame,
            mode: RenderMode::ReadOnly,
            selection: None,
            live_ink: &[],
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
        }
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_selection(mut self, selection: Option<&'a ElementId>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_live_ink(mut self, segments: &'a [InkSegment]) -> Self {
        self.live_ink = segments;
        self
    }

    pub fn with_rotate_handle_offset(mut self, offset: f64) -> Self {
        self.rotate_handle_offset = offset;
        self
    }
}

fn screen_frame(frame: &ElementFrame, scale: f64) -> ScreenFrame {
    ScreenFrame {
        origin: to_screen(frame.position, scale),
        size: frame.size * scale,
        rotation: frame.rotation,
    }
}

fn element_command(element: &Element, ink: &InkCanvas, scale: f64) -> Option<DrawCommand> {
    let id = element.id().clone();
    let frame = screen_frame(&element.frame, scale);
    Some(match &element.content {
        ElementContent::Text(block) => DrawCommand::Text {
            id,
            frame,
            body: block.body.clone(),
            font_family: block.style.font_family.clone(),
            font_size: block.style.font_size * scale,
            color: block.style.color,
            bold: block.style.bold,
            italic: block.style.italic,
            underline: block.style.underline,
        },
        ElementContent::Image(source) => DrawCommand::Image {
            id,
            frame,
            source: source.clone(),
        },
        ElementContent::Video(source) => DrawCommand::Video {
            id,
            frame,
            video: source.video(),
        },
        ElementContent::Link(url) => DrawCommand::LinkButton {
            id,
            frame,
            url: url.clone(),
            label: link_label(url),
        },
        ElementContent::Stroke(_) => {
            // Strokes are drawn as painted on the ink surface.
            let path = ink.stroke(&id)?;
            if !path.is_drawable() {
                return None;
            }
            DrawCommand::Ink {
                points: path.points().iter().map(|p| to_screen(*p, scale)).collect(),
                color: path.color(),
                width: path.width() * scale,
                id,
            }
        }
    })
}

/// Build the display list for one frame.
///
/// Content commands depend only on the document, the ink surface and the
/// device scale, so every renderer produces the same ones for the same
/// input. Interactive mode appends the selection outline, its handles and
/// the live ink on top.
pub fn build_display_list(ctx: &RenderContext<'_>) -> DisplayList {
    let scale = ctx.frame.scale;
    let mut list = DisplayList::new(ctx.frame.screen_size());

    list.push(DrawCommand::Background {
        size: ctx.frame.screen_size(),
        background: ctx.document.background.clone(),
    });

    for element in ctx.document.elements() {
        if let Some(command) = element_command(element, ctx.ink, scale) {
            list.push(command);
        }
    }

    if ctx.mode == RenderMode::Interactive {
        if let Some(selected) = ctx
            .selection
            .and_then(|id| ctx.document.element(id))
            .filter(|e| e.is_manipulable())
        {
            list.push(DrawCommand::SelectionOutline {
                id: selected.id().clone(),
                frame: screen_frame(&selected.frame, scale),
            });
            for handle in get_handles(selected, ctx.rotate_handle_offset) {
                list.push(DrawCommand::Handle {
                    id: selected.id().clone(),
                    kind: handle.kind,
                    center: to_screen(handle.position, scale),
                    size: HANDLE_SIZE,
                });
            }
        }
        for segment in ctx.live_ink {
            list.push(DrawCommand::LiveInk {
                from: to_screen(segment.from, scale),
                to: to_screen(segment.to, scale),
                color: segment.color,
                width: segment.width * scale,
            });
        }
    }

    list
}

/// A source of display lists.
pub trait Renderer {
    /// Frame the renderer targets.
    fn device_frame(&self) -> DeviceFrame;

    /// Document being rendered.
    fn document(&self) -> &CompositionDocument;

    /// Build the display list for the current state.
    fn render(&self) -> DisplayList;

    /// Color for clearing the surface before painting.
    fn clear_color(&self) -> Color {
        background_clear_color(&self.document().background)
    }
}

/// Solid stand-in for a background: the first stop of a gradient, black
/// behind images.
fn background_clear_color(background: &Background) -> Color {
    match background {
        Background::Color(color) => (*color).into(),
        Background::Gradient(gradient) => gradient.from.into(),
        Background::Image(_) => Color::from_rgba8(0, 0, 0, 255),
    }
}
