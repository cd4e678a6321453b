//! Image format tags and output format selection.

use serde::{Deserialize, Serialize};

/// Format classification of an uploaded byte buffer, derived from its
/// leading byte signature. Exactly one tag per signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Jpeg,
    Png,
    Gif,
    WebP,
    Avif,
    Heic,
    /// Recognized video container (never accepted).
    Video,
    /// Signature matched no known container.
    Unknown,
    /// Fewer than 4 bytes available; nothing can be classified.
    #[serde(rename = "invalid-too-short")]
    TooShort,
}

impl FormatTag {
    /// Whether the tag names a concrete image format.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            FormatTag::Jpeg
                | FormatTag::Png
                | FormatTag::Gif
                | FormatTag::WebP
                | FormatTag::Avif
                | FormatTag::Heic
        )
    }

    /// Map a declared content type to its format tag, if it names a
    /// recognized image format. `image/jpg` is tolerated alongside
    /// `image/jpeg`.
    pub fn from_mime(mime: &str) -> Option<FormatTag> {
        match mime.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(FormatTag::Jpeg),
            "image/png" => Some(FormatTag::Png),
            "image/gif" => Some(FormatTag::Gif),
            "image/webp" => Some(FormatTag::WebP),
            "image/avif" => Some(FormatTag::Avif),
            "image/heic" | "image/heif" => Some(FormatTag::Heic),
            _ => None,
        }
    }

    /// Display label for preview panels (e.g. "JPEG").
    pub fn label(self) -> &'static str {
        match self {
            FormatTag::Jpeg => "JPEG",
            FormatTag::Png => "PNG",
            FormatTag::Gif => "GIF",
            FormatTag::WebP => "WEBP",
            FormatTag::Avif => "AVIF",
            FormatTag::Heic => "HEIC",
            FormatTag::Video => "VIDEO",
            FormatTag::Unknown => "UNKNOWN",
            FormatTag::TooShort => "INVALID",
        }
    }
}

/// Output format for optimized images. The encode side is a closed set of
/// four formats; an unsupported target is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Avif,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            "avif" => Some(OutputFormat::Avif),
            _ => None,
        }
    }

    /// Wire value used in multipart `format` fields.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Avif => "image/avif",
        }
    }

    /// Filename extension for download links.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    pub fn as_tag(self) -> FormatTag {
        match self {
            OutputFormat::Jpeg => FormatTag::Jpeg,
            OutputFormat::Png => FormatTag::Png,
            OutputFormat::WebP => FormatTag::WebP,
            OutputFormat::Avif => FormatTag::Avif,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("webp"), Some(OutputFormat::WebP));
        assert_eq!(OutputFormat::parse("avif"), Some(OutputFormat::Avif));
        assert_eq!(OutputFormat::parse("tiff"), None);
    }

    #[test]
    fn test_output_format_mime_type() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::WebP.mime_type(), "image/webp");
        assert_eq!(OutputFormat::Avif.mime_type(), "image/avif");
    }

    #[test]
    fn test_format_tag_from_mime() {
        assert_eq!(FormatTag::from_mime("image/jpeg"), Some(FormatTag::Jpeg));
        assert_eq!(FormatTag::from_mime("image/jpg"), Some(FormatTag::Jpeg));
        assert_eq!(FormatTag::from_mime("IMAGE/PNG"), Some(FormatTag::Png));
        assert_eq!(FormatTag::from_mime("image/heif"), Some(FormatTag::Heic));
        assert_eq!(FormatTag::from_mime("video/mp4"), None);
        assert_eq!(FormatTag::from_mime(""), None);
    }

    #[test]
    fn test_format_tag_is_image() {
        assert!(FormatTag::Jpeg.is_image());
        assert!(FormatTag::Heic.is_image());
        assert!(!FormatTag::Video.is_image());
        assert!(!FormatTag::Unknown.is_image());
        assert!(!FormatTag::TooShort.is_image());
    }

    #[test]
    fn test_format_tag_serde_names() {
        assert_eq!(serde_json::to_string(&FormatTag::WebP).unwrap(), "\"webp\"");
        assert_eq!(
            serde_json::to_string(&FormatTag::TooShort).unwrap(),
            "\"invalid-too-short\""
        );
        let tag: FormatTag = serde_json::from_str("\"avif\"").unwrap();
        assert_eq!(tag, FormatTag::Avif);
    }
}
