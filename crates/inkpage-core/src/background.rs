//! Page backgrounds.

use crate::elements::{MediaSource, SerializableColor};
use serde::{Deserialize, Serialize};

/// Default gradient start (`#7c6afa`).
pub const DEFAULT_GRADIENT_FROM: SerializableColor = SerializableColor::new(0x7c, 0x6a, 0xfa, 255);
/// Default gradient end (`#c89afc`).
pub const DEFAULT_GRADIENT_TO: SerializableColor = SerializableColor::new(0xc8, 0x9a, 0xfc, 255);
/// Default gradient direction in degrees.
pub const DEFAULT_GRADIENT_ANGLE: f64 = 135.0;

/// Which background descriptor is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Gradient,
    Image,
}

impl BackgroundKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            BackgroundKind::Color => "color",
            BackgroundKind::Gradient => "gradient",
            BackgroundKind::Image => "image",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "color" => Some(BackgroundKind::Color),
            "gradient" => Some(BackgroundKind::Gradient),
            "image" => Some(BackgroundKind::Image),
            _ => None,
        }
    }
}

/// Two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Direction in degrees, CSS convention.
    pub angle: f64,
    pub from: SerializableColor,
    pub to: SerializableColor,
}

impl Gradient {
    pub fn new(from: SerializableColor, to: SerializableColor) -> Self {
        Self {
            angle: DEFAULT_GRADIENT_ANGLE,
            from,
            to,
        }
    }

    /// Parse `linear-gradient(<angle>deg, <from> [stop], <to> [stop])` or a
    /// bare `<from>, <to>` pair.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let args = match value.strip_prefix("linear-gradient(") {
            Some(rest) => rest.strip_suffix(')')?,
            None => value,
        };
        let parts = split_top_level(args);
        let (angle, colors) = match parts.first().and_then(|p| p.strip_suffix("deg")) {
            Some(angle) => (angle.trim().parse::<f64>().ok()?, &parts[1..]),
            None => (DEFAULT_GRADIENT_ANGLE, &parts[..]),
        };
        if colors.len() != 2 {
            return None;
        }
        let stop_color = |stop: &str| {
            // Drop a trailing "NN%" position, keeping rgb()/rgba() intact.
            let color = match stop.rsplit_once(' ') {
                Some((color, pos)) if pos.ends_with('%') => color,
                _ => stop,
            };
            SerializableColor::parse(color)
        };
        Some(Self {
            angle,
            from: stop_color(colors[0])?,
            to: stop_color(colors[1])?,
        })
    }

    pub fn to_css(&self) -> String {
        format!(
            "linear-gradient({}deg, {}, {})",
            self.angle,
            self.from.to_css(),
            self.to.to_css()
        )
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new(DEFAULT_GRADIENT_FROM, DEFAULT_GRADIENT_TO)
    }
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}

/// The active page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Color(SerializableColor),
    Gradient(Gradient),
    Image(MediaSource),
}

impl Background {
    pub fn kind(&self) -> BackgroundKind {
        match self {
            Background::Color(_) => BackgroundKind::Color,
            Background::Gradient(_) => BackgroundKind::Gradient,
            Background::Image(_) => BackgroundKind::Image,
        }
    }

    /// Build from a persisted `{type, value}` pair.
    pub fn from_wire(kind: &str, value: &str) -> Option<Self> {
        match BackgroundKind::from_wire(kind)? {
            BackgroundKind::Color => SerializableColor::parse(value).map(Background::Color),
            BackgroundKind::Gradient => Gradient::parse(value).map(Background::Gradient),
            BackgroundKind::Image => Some(Background::Image(MediaSource::parse(value))),
        }
    }

    /// Persisted value string.
    pub fn wire_value(&self) -> String {
        match self {
            Background::Color(color) => color.to_css(),
            Background::Gradient(gradient) => gradient.to_css(),
            Background::Image(source) => source.to_content(),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Gradient(Gradient::default())
    }
}

/// Editor-side background settings.
///
/// Remembers the last value of every background type so switching type only
/// changes what is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundPalette {
    active: BackgroundKind,
    color: SerializableColor,
    gradient: Gradient,
    image: MediaSource,
}

impl Default for BackgroundPalette {
    fn default() -> Self {
        Self {
            active: BackgroundKind::Gradient,
            color: SerializableColor::new(0x04, 0x04, 0x04, 255),
            gradient: Gradient::default(),
            image: MediaSource::Empty,
        }
    }
}

impl BackgroundPalette {
    /// Seed the palette from a loaded background.
    pub fn from_background(background: &Background) -> Self {
        let mut palette = Self::default();
        palette.remember(background.clone());
        palette
    }

    pub fn active(&self) -> BackgroundKind {
        self.active
    }

    /// Store `background` as the value of its type and make it active.
    pub fn remember(&mut self, background: Background) {
        self.active = background.kind();
        match background {
            Background::Color(color) => self.color = color,
            Background::Gradient(gradient) => self.gradient = gradient,
            Background::Image(source) => self.image = source,
        }
    }

    /// Switch the active type, keeping every stored value.
    pub fn switch_to(&mut self, kind: BackgroundKind) {
        self.active = kind;
    }

    /// Background currently rendered.
    pub fn current(&self) -> Background {
        match self.active {
            BackgroundKind::Color => Background::Color(self.color),
            BackgroundKind::Gradient => Background::Gradient(self.gradient),
            BackgroundKind::Image => Background::Image(self.image.clone()),
        }
    }
}
