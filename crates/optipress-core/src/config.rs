//! Configuration module
//!
//! Upload limits and optimization defaults, loaded from environment
//! variables with sensible defaults for local development.

use std::env;

use crate::constants::{
    ACCEPTED_CONTENT_TYPES, ACCEPTED_EXTENSIONS, DEFAULT_FORMAT, DEFAULT_MAX_FILE_SIZE_MB,
    DEFAULT_QUALITY,
};
use crate::models::OutputFormat;

/// Upload validation and optimization defaults.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub default_format: OutputFormat,
    pub default_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            allowed_content_types: ACCEPTED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_format: OutputFormat::WebP,
            default_quality: DEFAULT_QUALITY,
        }
    }
}

impl UploadConfig {
    /// Load from environment variables. Unset or unparseable values fall
    /// back to the defaults above. Reads a `.env` file if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .map(|v| split_csv(&v))
            .unwrap_or_else(|_| ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect());

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .map(|v| split_csv(&v))
            .unwrap_or_else(|_| {
                ACCEPTED_CONTENT_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let default_format = env::var("DEFAULT_FORMAT")
            .ok()
            .and_then(|v| OutputFormat::parse(&v))
            .or_else(|| OutputFormat::parse(DEFAULT_FORMAT))
            .unwrap_or(OutputFormat::WebP);

        let default_quality = env::var("DEFAULT_QUALITY")
            .ok()
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|q| *q <= 100)
            .unwrap_or(DEFAULT_QUALITY);

        Self {
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            allowed_content_types,
            default_format,
            default_quality,
        }
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UploadConfig::default();
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert!(config.allowed_extensions.contains(&"heic".to_string()));
        assert!(config
            .allowed_content_types
            .contains(&"image/webp".to_string()));
        assert_eq!(config.default_format, OutputFormat::WebP);
        assert_eq!(config.default_quality, 80);
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(
            split_csv("jpg, PNG ,webp,"),
            vec!["jpg".to_string(), "png".to_string(), "webp".to_string()]
        );
        assert!(split_csv("").is_empty());
    }
}
