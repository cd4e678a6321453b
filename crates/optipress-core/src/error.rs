//! Error types module
//!
//! Domain error taxonomies for validation, transcoding, and transport.
//! Codec and HTTP internals are wrapped here, never passed through raw, so
//! the taxonomy stays stable across backend substitutions.

use crate::models::ValidationReason;

/// Validation errors for uploaded files. Terminal for the current file,
/// recoverable at the session level.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Declared type '{declared}' does not match detected format '{detected}'")]
    DeclaredTypeMismatch { declared: String, detected: String },

    #[error("Videos are not supported. Please upload an image file.")]
    IsVideo,

    #[error("Invalid file type. Only images are accepted.")]
    Unrecognized,
}

impl ValidationError {
    pub fn reason(&self) -> ValidationReason {
        match self {
            ValidationError::TooLarge { .. } => ValidationReason::TooLarge,
            ValidationError::DeclaredTypeMismatch { .. } => ValidationReason::DeclaredTypeMismatch,
            ValidationError::IsVideo => ValidationReason::IsVideo,
            ValidationError::Unrecognized => ValidationReason::Unrecognized,
        }
    }
}

/// Transcode engine errors.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Unsupported source image: {0}")]
    UnsupportedSource(String),

    #[error("Quality must be between 0 and 100 (got {quality})")]
    InvalidParameters { quality: u8 },

    #[error("Failed to encode {format} output")]
    EncodeFailure {
        format: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Transport errors from the optimization boundary call. The transport
/// layer is responsible for bounding request latency; the session only
/// maps these into its failed state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_reason_mapping() {
        assert_eq!(
            ValidationError::TooLarge { size: 10, max: 5 }.reason(),
            ValidationReason::TooLarge
        );
        assert_eq!(ValidationError::IsVideo.reason(), ValidationReason::IsVideo);
        assert_eq!(
            ValidationError::Unrecognized.reason(),
            ValidationReason::Unrecognized
        );
    }

    #[test]
    fn test_messages_are_user_visible() {
        let err = ValidationError::TooLarge {
            size: 20 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        assert!(err.to_string().contains("File too large"));

        let err = TranscodeError::InvalidParameters { quality: 101 };
        assert!(err.to_string().contains("between 0 and 100"));
    }
}
