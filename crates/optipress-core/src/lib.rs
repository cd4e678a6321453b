//! Optipress Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! constants shared across all Optipress components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::UploadConfig;
pub use error::{TranscodeError, TransportError, ValidationError};
pub use models::{
    format_bytes, FormatTag, ImageAsset, OptimizationRequest, OptimizationResult,
    OptimizeResponse, OutputFormat, SliderState, ValidationOutcome, ValidationReason,
};
