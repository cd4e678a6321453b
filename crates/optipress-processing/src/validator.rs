//! Upload validation gate.
//!
//! Combines the byte-signature sniffer with declared content type, filename
//! extension, and size limits into a single accept/reject decision. Trust
//! is asymmetric: a video can never be accepted on declared type or
//! extension alone, while an image that does not classify cleanly (some
//! HEIC variants) may fall back to them.

use optipress_core::constants::VIDEO_EXTENSIONS;
use optipress_core::{
    FormatTag, ImageAsset, UploadConfig, ValidationError, ValidationOutcome,
};

use crate::sniffer::classify;

/// Upload file validator.
///
/// Holds the size limit and the accepted extension / content-type sets
/// without coupling to where they were configured.
pub struct UploadValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(
        max_file_size: u64,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        )
    }

    /// Validate one candidate file. Rules apply in order; the first failing
    /// rule wins and its reason becomes the user-visible message.
    pub fn validate(&self, asset: &ImageAsset) -> ValidationOutcome {
        if asset.size_bytes > self.max_file_size {
            return reject(
                ValidationError::TooLarge {
                    size: asset.size_bytes,
                    max: self.max_file_size,
                },
                FormatTag::Unknown,
            );
        }

        // A correctly-labeled or correctly-named video fails fast, before
        // the bytes are even inspected.
        if asset.declared_mime.to_lowercase().starts_with("video/") {
            return reject(ValidationError::IsVideo, FormatTag::Video);
        }
        if let Some(ext) = asset.extension() {
            if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
                return reject(ValidationError::IsVideo, FormatTag::Video);
            }
        }

        let sniffed = classify(asset.signature());

        if sniffed == FormatTag::Video {
            return reject(ValidationError::IsVideo, FormatTag::Video);
        }

        if matches!(sniffed, FormatTag::Unknown | FormatTag::TooShort) {
            return self.validate_fallback(asset, sniffed);
        }

        // Concrete image signature. Cross-check the declared content type:
        // bytes that say one image format under a header that names another
        // are a renamed or spoofed file.
        if let Some(declared) = FormatTag::from_mime(&asset.declared_mime) {
            if declared != sniffed {
                return reject(
                    ValidationError::DeclaredTypeMismatch {
                        declared: asset.declared_mime.to_lowercase(),
                        detected: sniffed.label().to_string(),
                    },
                    sniffed,
                );
            }
        }

        ValidationOutcome::accept(sniffed)
    }

    /// Fallback for buffers the sniffer cannot place: accept when either
    /// the declared content type or the filename extension is in the
    /// accepted set, with a best-effort tag from the declared type.
    fn validate_fallback(&self, asset: &ImageAsset, sniffed: FormatTag) -> ValidationOutcome {
        let mime = asset.declared_mime.to_lowercase();
        let mime_ok = self.allowed_content_types.iter().any(|ct| *ct == mime);
        let ext_ok = asset
            .extension()
            .map(|ext| self.allowed_extensions.iter().any(|e| *e == ext))
            .unwrap_or(false);

        if mime_ok || ext_ok {
            tracing::debug!(
                declared_mime = %asset.declared_mime,
                filename = %asset.declared_name,
                sniffed = ?sniffed,
                "Signature not recognized, accepting on declared type/extension"
            );
            let tag = FormatTag::from_mime(&mime).unwrap_or(sniffed);
            ValidationOutcome::accept(tag)
        } else {
            reject(ValidationError::Unrecognized, sniffed)
        }
    }
}

fn reject(error: ValidationError, tag: FormatTag) -> ValidationOutcome {
    ValidationOutcome::reject(error.reason(), tag, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use optipress_core::ValidationReason;

    fn test_validator() -> UploadValidator {
        UploadValidator::from_config(&UploadConfig::default())
    }

    fn jpeg_asset(mime: &str, name: &str) -> ImageAsset {
        ImageAsset::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], mime, name)
    }

    #[test]
    fn test_accepts_clean_jpeg() {
        let outcome = test_validator().validate(&jpeg_asset("image/jpeg", "photo.jpg"));
        assert!(outcome.accepted);
        assert_eq!(outcome.format_tag, FormatTag::Jpeg);
        assert_eq!(outcome.reason, ValidationReason::Ok);
    }

    #[test]
    fn test_rejects_oversized_even_with_valid_signature() {
        let validator = UploadValidator::new(
            4,
            vec!["jpg".to_string()],
            vec!["image/jpeg".to_string()],
        );
        let outcome = validator.validate(&jpeg_asset("image/jpeg", "photo.jpg"));
        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::TooLarge);
        assert!(outcome.message.as_deref().unwrap().contains("too large"));
    }

    #[test]
    fn test_rejects_video_mime_regardless_of_bytes() {
        // JPEG bytes under a video/ content type still fail fast
        let outcome = test_validator().validate(&jpeg_asset("video/mp4", "clip.jpg"));
        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::IsVideo);
    }

    #[test]
    fn test_rejects_video_extension() {
        let asset = ImageAsset::new(vec![0u8; 8], "application/octet-stream", "movie.MP4");
        let outcome = test_validator().validate(&asset);
        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::IsVideo);
    }

    #[test]
    fn test_rejects_sniffed_video() {
        // WebM magic named as an image
        let asset = ImageAsset::new(
            vec![0x1A, 0x45, 0xDF, 0xA3, 0x00, 0x00],
            "image/png",
            "innocent.png",
        );
        let outcome = test_validator().validate(&asset);
        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::IsVideo);
        assert_eq!(outcome.format_tag, FormatTag::Video);
    }

    #[test]
    fn test_fallback_accepts_on_mime() {
        // Unknown bytes, accepted HEIC content type
        let asset = ImageAsset::new(vec![0u8; 16], "image/heic", "photo.bin");
        let outcome = test_validator().validate(&asset);
        assert!(outcome.accepted);
        assert_eq!(outcome.format_tag, FormatTag::Heic);
    }

    #[test]
    fn test_fallback_accepts_on_extension() {
        let asset = ImageAsset::new(vec![0u8; 16], "application/octet-stream", "photo.HEIF");
        let outcome = test_validator().validate(&asset);
        assert!(outcome.accepted);
    }

    #[test]
    fn test_fallback_rejects_when_nothing_matches() {
        let asset = ImageAsset::new(vec![0u8; 16], "application/pdf", "file.pdf");
        let outcome = test_validator().validate(&asset);
        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::Unrecognized);
        assert!(outcome.message.is_some());
    }

    #[test]
    fn test_too_short_buffer_uses_fallback() {
        let asset = ImageAsset::new(vec![0xFF, 0xD8], "image/jpeg", "tiny.jpg");
        let outcome = test_validator().validate(&asset);
        assert!(outcome.accepted);
        assert_eq!(outcome.format_tag, FormatTag::Jpeg);
    }

    #[test]
    fn test_declared_type_mismatch() {
        // PNG bytes declared as image/jpeg
        let asset = ImageAsset::new(
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            "image/jpeg",
            "photo.jpg",
        );
        let outcome = test_validator().validate(&asset);
        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::DeclaredTypeMismatch);
        assert_eq!(outcome.format_tag, FormatTag::Png);
    }

    #[test]
    fn test_non_image_mime_skips_cross_check() {
        // Concrete PNG signature with an empty declared type is accepted
        let asset = ImageAsset::new(
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            "",
            "photo.png",
        );
        let outcome = test_validator().validate(&asset);
        assert!(outcome.accepted);
        assert_eq!(outcome.format_tag, FormatTag::Png);
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let asset = ImageAsset::new(vec![0u8; 16], "application/octet-stream", "IMG_0001.AVIF");
        let outcome = test_validator().validate(&asset);
        assert!(outcome.accepted);
    }
}
