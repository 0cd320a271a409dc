use regex::Regex;
use std::sync::OnceLock;

/// Standard 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub(crate) fn svg_open_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<svg\b[^>]*>").expect("valid regex"))
}

/// The two container formats refig can annotate.
///
/// Detection is by payload inspection only; the filename extension is
/// at most a hint for callers choosing a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    /// Detect the container format from the payload bytes.
    pub fn sniff(payload: &[u8]) -> Option<Self> {
        if payload.starts_with(&PNG_SIGNATURE) {
            return Some(ImageFormat::Png);
        }
        let text = std::str::from_utf8(payload).ok()?;
        if svg_open_tag().is_match(text) {
            return Some(ImageFormat::Svg);
        }
        None
    }

    /// Map a filename extension (without the dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}
