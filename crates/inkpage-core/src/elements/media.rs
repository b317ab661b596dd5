//! Media references for image and video elements.
//!
//! Media are opaque: either an embedded blob carried as a base64 data URL or
//! an external URL. Nothing here decodes pixels.

use serde::{Deserialize, Serialize};

/// Reference to an image or video blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaSource {
    /// No media chosen yet.
    Empty,
    /// Blob embedded as `data:<mime>;base64,<payload>`.
    Embedded { mime: String, data_base64: String },
    /// External URL.
    Url(String),
}

impl MediaSource {
    /// Interpret a persisted content string.
    pub fn parse(content: &str) -> Self {
        let content = content.trim();
        if content.is_empty() {
            return MediaSource::Empty;
        }
        if let Some(rest) = content.strip_prefix("data:") {
            if let Some((mime, payload)) = rest.split_once(";base64,") {
                return MediaSource::Embedded {
                    mime: mime.to_string(),
                    data_base64: payload.to_string(),
                };
            }
        }
        MediaSource::Url(content.to_string())
    }

    /// Embed raw bytes. The MIME type is sniffed from magic bytes when
    /// `mime` is `None`.
    pub fn from_bytes(data: &[u8], mime: Option<&str>) -> Self {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let mime = mime
            .map(str::to_string)
            .or_else(|| sniff_mime(data).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        MediaSource::Embedded {
            mime,
            data_base64: STANDARD.encode(data),
        }
    }

    /// Persisted content string.
    pub fn to_content(&self) -> String {
        match self {
            MediaSource::Empty => String::new(),
            MediaSource::Embedded { mime, data_base64 } => {
                format!("data:{mime};base64,{data_base64}")
            }
            MediaSource::Url(url) => url.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MediaSource::Empty)
    }

    /// MIME type of embedded media.
    pub fn mime(&self) -> Option<&str> {
        match self {
            MediaSource::Embedded { mime, .. } => Some(mime),
            _ => None,
        }
    }

    /// Decide how a video element should be presented.
    pub fn video(&self) -> VideoSource {
        match self {
            MediaSource::Empty => VideoSource::None,
            MediaSource::Embedded { mime, .. } if mime.starts_with("video/") => {
                VideoSource::Playable(self.to_content())
            }
            MediaSource::Embedded { .. } => VideoSource::Placeholder,
            MediaSource::Url(url) => match youtube_video_id(url) {
                Some(id) => VideoSource::YouTube(id),
                None => VideoSource::Placeholder,
            },
        }
    }
}

/// How a video element is presented by renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoSource {
    /// Nothing to show.
    None,
    /// Embedded video that can play inline (full data URL).
    Playable(String),
    /// YouTube embed, by video id.
    YouTube(String),
    /// Unplayable reference; a placeholder is drawn.
    Placeholder,
}

/// Detect a MIME type from magic bytes.
pub(crate) fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }
    // PNG: 89 50 4E 47
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some("image/png");
    }
    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    // GIF87a / GIF89a
    if data.starts_with(b"GIF8") {
        return Some("image/gif");
    }
    if data.len() >= 12 {
        // WebP: RIFF....WEBP
        if &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }
        // ISO base media (MP4): ....ftyp
        if &data[4..8] == b"ftyp" {
            return Some("video/mp4");
        }
    }
    // WebM / Matroska EBML header
    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("video/webm");
    }
    None
}

/// Extract a YouTube video id from watch, short and embed URLs.
pub(crate) fn youtube_video_id(url: &str) -> Option<String> {
    let take_id = |rest: &str| -> Option<String> {
        let id: String = rest
            .chars()
            .take_while(|c| !matches!(c, '&' | '?' | '#' | '/'))
            .collect();
        (!id.is_empty()).then_some(id)
    };

    if let Some((_, rest)) = url.split_once("youtu.be/") {
        return take_id(rest);
    }
    let (_, path) = url.split_once("youtube.com/")?;
    if let Some(rest) = path.strip_prefix("embed/") {
        return take_id(rest);
    }
    let (_, rest) = path.split_once("v=")?;
    take_id(rest)
}
