//! Display lists: ordered draw commands in screen pixels.

use inkpage_core::selection::HandleKind;
use inkpage_core::{Background, ElementId, MediaSource, SerializableColor, VideoSource};
use kurbo::{Point, Size};
use serde::Serialize;

/// Screen-space placement of an element. Rotation (degrees) turns it about
/// its own center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenFrame {
    pub origin: Point,
    pub size: Size,
    pub rotation: f64,
}

/// One draw command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DrawCommand {
    Background {
        size: Size,
        background: Background,
    },
    Text {
        id: ElementId,
        frame: ScreenFrame,
        body: String,
        font_family: String,
        /// Font size in screen pixels.
        font_size: f64,
        color: SerializableColor,
        bold: bool,
        italic: bool,
        underline: bool,
    },
    Image {
        id: ElementId,
        frame: ScreenFrame,
        source: MediaSource,
    },
    Video {
        id: ElementId,
        frame: ScreenFrame,
        video: VideoSource,
    },
    LinkButton {
        id: ElementId,
        frame: ScreenFrame,
        url: String,
        label: String,
    },
    Ink {
        id: ElementId,
        points: Vec<Point>,
        color: SerializableColor,
        width: f64,
    },
    SelectionOutline {
        id: ElementId,
        frame: ScreenFrame,
    },
    Handle {
        id: ElementId,
        kind: HandleKind,
        center: Point,
        size: f64,
    },
    LiveInk {
        from: Point,
        to: Point,
        color: SerializableColor,
        width: f64,
    },
}

impl DrawCommand {
    /// Commands only the editor draws.
    pub fn is_editor_affordance(&self) -> bool {
        matches!(
            self,
            DrawCommand::SelectionOutline { .. }
                | DrawCommand::Handle { .. }
                | DrawCommand::LiveInk { .. }
        )
    }

    /// Element the command paints, if any.
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            DrawCommand::Text { id, .. }
            | DrawCommand::Image { id, .. }
            | DrawCommand::Video { id, .. }
            | DrawCommand::LinkButton { id, .. }
            | DrawCommand::Ink { id, .. }
            | DrawCommand::SelectionOutline { id, .. }
            | DrawCommand::Handle { id, .. } => Some(id),
            DrawCommand::Background { .. } | DrawCommand::LiveInk { .. } => None,
        }
    }
}

/// Ordered draw commands for one frame; the first command paints first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    /// Surface size in screen pixels.
    pub size: Size,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        log::trace!("{:?}", command);
        self.commands.push(command);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Everything except selection, handle and live-ink affordances.
    pub fn content_commands(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|c| !c.is_editor_affordance())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Label shown on a link button: the URL, cut to 20 characters.
pub fn link_label(url: &str) -> String {
    const MAX_CHARS: usize = 20;
    if url.chars().count() > MAX_CHARS {
        let head: String = url.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}
