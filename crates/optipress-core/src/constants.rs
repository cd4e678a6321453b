//! Shared constants for upload validation and optimization defaults.

/// Number of leading bytes captured for signature sniffing.
pub const SIGNATURE_LEN: usize = 16;

/// File extensions accepted for image uploads (lowercase, no dot).
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "avif", "heic", "heif",
];

/// Content types accepted for image uploads.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/avif",
    "image/heic",
    "image/heif",
];

/// Common video file extensions, rejected up front even when the declared
/// content type is missing or wrong.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "wmv", "flv", "webm", "mkv", "m4v"];

/// Default upload size limit in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// Default target format for optimization.
pub const DEFAULT_FORMAT: &str = "webp";

/// Default encode quality.
pub const DEFAULT_QUALITY: u8 = 80;

/// Quality range offered by the UI slider. The transcode engine itself
/// accepts the full 0-100 contract.
pub const UI_QUALITY_MIN: u8 = 10;
pub const UI_QUALITY_MAX: u8 = 100;
