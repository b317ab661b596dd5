//! InkPage Core Library
//!
//! Document model, geometry, gestures and ink capture for QR-reached profile
//! pages. Rendering lives in `inkpage-render`.

pub mod background;
pub mod config;
pub mod document;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod input;
pub mod manipulation;
pub mod persisted;
pub mod selection;
pub mod session;
pub mod storage;
pub mod stroke;

pub use background::{Background, BackgroundKind, BackgroundPalette, Gradient};
pub use config::EditorConfig;
pub use document::{CompositionDocument, LoadReport, PageMetadata};
pub use elements::{
    DrawingPath, Element, ElementContent, ElementId, ElementKind, ElementPatch, MediaSource,
    SerializableColor, TextBlock, TextStyle, TextStylePatch, VideoSource,
};
pub use error::{CanvasError, CanvasResult};
pub use geometry::{ElementFrame, to_screen, to_virtual};
pub use input::PointerEvent;
pub use manipulation::{ManipulationState, Manipulator, PointerDown};
pub use persisted::PersistedDocument;
pub use selection::{Handle, HandleKind, Selection};
pub use session::EditorSession;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StoredPage};
pub use stroke::{InkCanvas, InkSegment, InkSurface, StrokeCapture};
