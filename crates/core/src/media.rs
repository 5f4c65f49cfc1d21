use serde::{Deserialize, Serialize};

/// Kind of media asset referenced from a quiz document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image. Default when a hint is inconclusive.
    Image,
    /// Audio clip.
    Audio,
    /// Video clip.
    Video,
}

impl MediaKind {
    /// Stable lowercase label stored in draft records.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a referenced asset from a text hint (alt text or URL).
///
/// Case-insensitive substring match: a hint mentioning "video" or "audio"
/// wins, anything else is an image.
pub fn classify(hint: &str) -> MediaKind {
    let lowered = hint.to_ascii_lowercase();
    if lowered.contains("video") {
        MediaKind::Video
    } else if lowered.contains("audio") {
        MediaKind::Audio
    } else {
        MediaKind::Image
    }
}
