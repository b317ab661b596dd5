//! Device preview.

use crate::display::DisplayList;
use crate::frame::{DeviceFrame, DevicePreset};
use crate::renderer::{RenderContext, Renderer, build_display_list};
use inkpage_core::{CompositionDocument, InkCanvas};

/// Read-only view of a document snapshot on a chosen device frame.
///
/// The renderer owns its copy of the document and repaints every stroke
/// onto its own ink canvas, so it never reads editor state. Switching
/// frames only changes the scale applied at render time.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    document: CompositionDocument,
    ink: InkCanvas,
    frame: DeviceFrame,
    preset: Option<DevicePreset>,
}

impl PreviewRenderer {
    pub fn new(document: CompositionDocument) -> Self {
        let ink = InkCanvas::from_document(&document);
        let preset = DevicePreset::default();
        Self {
            document,
            ink,
            frame: preset.frame(),
            preset: Some(preset),
        }
    }

    pub fn with_device(mut self, preset: DevicePreset) -> Self {
        self.set_device(preset);
        self
    }

    pub fn set_device(&mut self, preset: DevicePreset) {
        log::debug!("Preview device: {}", preset.name());
        self.frame = preset.frame();
        self.preset = Some(preset);
    }

    /// Use a custom frame instead of a preset.
    pub fn set_frame(&mut self, frame: DeviceFrame) {
        self.frame = frame;
        self.preset = None;
    }

    /// Active preset, `None` for a custom frame.
    pub fn device(&self) -> Option<DevicePreset> {
        self.preset
    }

    pub fn ink(&self) -> &InkCanvas {
        &self.ink
    }
}

impl Renderer for PreviewRenderer {
    fn device_frame(&self) -> DeviceFrame {
        self.frame
    }

    fn document(&self) -> &CompositionDocument {
        &self.document
    }

    fn render(&self) -> DisplayList {
        build_display_list(&RenderContext::new(&self.document, &self.ink, self.frame))
    }
}
