//! Upload assets, optimization requests/results, and validation outcomes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::format::{FormatTag, OutputFormat};

/// One selected file, held for the lifetime of a single upload attempt.
#[derive(Clone, Debug)]
pub struct ImageAsset {
    pub bytes: Bytes,
    pub declared_mime: String,
    pub declared_name: String,
    pub size_bytes: u64,
}

impl ImageAsset {
    pub fn new(
        bytes: impl Into<Bytes>,
        declared_mime: impl Into<String>,
        declared_name: impl Into<String>,
    ) -> Self {
        let bytes = bytes.into();
        let size_bytes = bytes.len() as u64;
        Self {
            bytes,
            declared_mime: declared_mime.into(),
            declared_name: declared_name.into(),
            size_bytes,
        }
    }

    /// Lowercased filename extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.declared_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Leading bytes used for signature sniffing.
    pub fn signature(&self) -> &[u8] {
        let len = self.bytes.len().min(crate::constants::SIGNATURE_LEN);
        &self.bytes[..len]
    }
}

/// Why a validation outcome accepted or rejected the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationReason {
    Ok,
    TooLarge,
    DeclaredTypeMismatch,
    IsVideo,
    Unrecognized,
}

/// Accept/reject decision for one candidate file. Produced once per file;
/// a rejected outcome must never reach the transcode engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub accepted: bool,
    pub reason: ValidationReason,
    pub format_tag: FormatTag,
    /// User-visible message, set on every rejection path.
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn accept(format_tag: FormatTag) -> Self {
        Self {
            accepted: true,
            reason: ValidationReason::Ok,
            format_tag,
            message: None,
        }
    }

    pub fn reject(reason: ValidationReason, format_tag: FormatTag, message: String) -> Self {
        Self {
            accepted: false,
            reason,
            format_tag,
            message: Some(message),
        }
    }
}

/// Parameters for one optimize action. `source` borrows the session asset's
/// buffer (`Bytes` clone shares the allocation).
#[derive(Clone, Debug)]
pub struct OptimizationRequest {
    pub source: Bytes,
    pub target_format: OutputFormat,
    pub quality: u8,
}

/// Encoded output plus the metadata a caller needs to compute a
/// compression ratio. Dimensions reflect the decoded source; format
/// conversion does not resize.
#[derive(Clone, Debug)]
pub struct OptimizationResult {
    pub bytes: Bytes,
    pub width_px: u32,
    pub height_px: u32,
    pub size_bytes: u64,
    pub format: FormatTag,
}

impl OptimizationResult {
    /// Suggested filename for download links.
    pub fn download_filename(&self, format: OutputFormat) -> String {
        format!("optimized-image.{}", format.extension())
    }
}

/// JSON response shape of the reference optimization endpoint. The field
/// names are a wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub url: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub filename: String,
}

/// Format a byte count for display (B / KB / MB).
pub fn format_bytes(bytes: u64) -> String {
    const K: u64 = 1024;
    if bytes < K {
        format!("{} B", bytes)
    } else if bytes < K * K {
        format!("{:.1} KB", bytes as f64 / K as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / (K * K) as f64)
    }
}
