//! InkPage Render Library
//!
//! Display-list renderers for InkPage documents: the editable canvas, the
//! device preview and the public viewer. All three share one builder, so a
//! document looks the same everywhere apart from the editor's affordances.

pub mod display;
mod editable;
pub mod frame;
mod preview;
mod public;
mod renderer;

pub use display::{DisplayList, DrawCommand, ScreenFrame};
pub use editable::EditableRenderer;
pub use frame::{DeviceFrame, DevicePreset};
pub use preview::PreviewRenderer;
pub use public::PublicRenderer;
pub use renderer::{
    RenderContext, RenderError, RenderMode, RenderResult, Renderer, build_display_list,
};
