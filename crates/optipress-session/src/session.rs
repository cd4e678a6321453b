//! Optimization session state machine.
//!
//! One instance per selected file. Sniffing, validation, and state
//! transitions are synchronous; only the transport call suspends, and it is
//! driven by the caller through the `begin_optimize` / `complete_optimize`
//! pair. Results are matched to requests by a monotonically increasing
//! sequence number, so a superseded request's late result can never
//! overwrite a newer one.

use optipress_core::{
    FormatTag, ImageAsset, OptimizationRequest, OptimizationResult, OutputFormat, SliderState,
    TransportError, UploadConfig,
};
use optipress_processing::{probe_dimensions, UploadValidator};

use crate::transport::OptimizeTransport;

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Validating,
    Previewing,
    Optimizing,
    Complete,
}

/// Metadata shown while previewing an accepted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInfo {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub format_label: String,
}

/// A request handed to the transport layer. The caller submits it and
/// reports back through `complete_optimize` with the same sequence number.
#[derive(Debug, Clone)]
pub struct PendingOptimize {
    pub seq: u64,
    pub request: OptimizationRequest,
}

/// Client-facing optimization session.
pub struct OptimizationSession {
    validator: UploadValidator,
    phase: SessionPhase,
    error: Option<String>,
    asset: Option<ImageAsset>,
    preview: Option<PreviewInfo>,
    result: Option<OptimizationResult>,
    ratio: Option<f64>,
    slider: SliderState,
    target_format: OutputFormat,
    quality: u8,
    next_seq: u64,
    inflight_seq: Option<u64>,
}

impl OptimizationSession {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            validator: UploadValidator::from_config(config),
            phase: SessionPhase::Idle,
            error: None,
            asset: None,
            preview: None,
            result: None,
            ratio: None,
            slider: SliderState::default(),
            target_format: config.default_format,
            quality: config.default_quality,
            next_seq: 0,
            inflight_seq: None,
        }
    }

    /// A new file was selected. Releases the previous asset and result,
    /// invalidates any in-flight request, and runs the validation gate.
    pub fn select_file(&mut self, asset: ImageAsset) {
        self.phase = SessionPhase::Validating;
        self.error = None;
        self.asset = None;
        self.preview = None;
        self.result = None;
        self.ratio = None;
        self.inflight_seq = None;
        self.slider.reset();

        let outcome = self.validator.validate(&asset);
        if !outcome.accepted {
            tracing::debug!(
                reason = ?outcome.reason,
                filename = %asset.declared_name,
                "Upload rejected"
            );
            self.error = outcome.message;
            self.phase = SessionPhase::Idle;
            return;
        }

        let (width, height) = probe_dimensions(&asset.bytes).unwrap_or((0, 0));
        self.preview = Some(PreviewInfo {
            width,
            height,
            size_bytes: asset.size_bytes,
            format_label: format_label(outcome.format_tag, &asset.declared_mime),
        });
        self.asset = Some(asset);
        self.phase = SessionPhase::Previewing;
    }

    /// Change the target format. From `Complete` this discards the current
    /// result and returns to `Previewing` without re-running validation.
    pub fn set_format(&mut self, format: OutputFormat) {
        self.target_format = format;
        self.invalidate_result();
    }

    /// Change the target quality. Values above 100 violate the caller
    /// contract and are ignored.
    pub fn set_quality(&mut self, quality: u8) {
        if quality > 100 {
            tracing::debug!(quality, "Ignoring out-of-range quality");
            return;
        }
        self.quality = quality;
        self.invalidate_result();
    }

    /// Start an optimize action. Returns the request to hand to the
    /// transport, or `None` when no validated file is held. Calling again
    /// while a request is in flight supersedes it: the newer sequence
    /// number wins and the older result is discarded on arrival.
    pub fn begin_optimize(&mut self) -> Option<PendingOptimize> {
        if self.asset.is_none()
            || matches!(self.phase, SessionPhase::Idle | SessionPhase::Validating)
        {
            tracing::debug!(phase = ?self.phase, "Optimize requested without a previewable file");
            return None;
        }

        if self.phase == SessionPhase::Complete {
            self.result = None;
            self.ratio = None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.inflight_seq = Some(seq);
        self.phase = SessionPhase::Optimizing;

        let asset = self.asset.as_ref()?;
        Some(PendingOptimize {
            seq,
            request: OptimizationRequest {
                source: asset.bytes.clone(),
                target_format: self.target_format,
                quality: self.quality,
            },
        })
    }

    /// Apply the outcome of a transport call. Returns `true` when the
    /// outcome was applied; a result whose sequence number is not the
    /// latest issued one (superseded, or for a previously selected file)
    /// is discarded.
    pub fn complete_optimize(
        &mut self,
        seq: u64,
        outcome: Result<OptimizationResult, TransportError>,
    ) -> bool {
        if self.inflight_seq != Some(seq) {
            tracing::debug!(seq, inflight = ?self.inflight_seq, "Discarding stale optimization result");
            return false;
        }
        self.inflight_seq = None;

        match outcome {
            Ok(result) => {
                // An in-flight sequence implies a held asset: select_file
                // clears both together.
                let original = self.asset.as_ref().map(|a| a.size_bytes).unwrap_or(0);
                self.ratio = Some(compression_ratio_percent(original, result.size_bytes));
                self.result = Some(result);
                self.error = None;
                self.slider.reset();
                self.phase = SessionPhase::Complete;
            }
            Err(err) => {
                // The asset is kept so a retry does not require re-selection.
                self.error = Some(err.to_string());
                self.phase = SessionPhase::Previewing;
            }
        }
        true
    }

    /// Convenience driver: begin, submit, and apply in one call. Supersede
    /// semantics still hold if other requests were issued concurrently
    /// through `begin_optimize`.
    pub async fn optimize(&mut self, transport: &dyn OptimizeTransport) -> bool {
        let Some(pending) = self.begin_optimize() else {
            return false;
        };
        let outcome = transport.submit_optimization(&pending.request).await;
        self.complete_optimize(pending.seq, outcome)
    }

    fn invalidate_result(&mut self) {
        if self.phase == SessionPhase::Complete {
            self.result = None;
            self.ratio = None;
            self.phase = SessionPhase::Previewing;
        }
    }

    // Observable state for rendering.

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn asset(&self) -> Option<&ImageAsset> {
        self.asset.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewInfo> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    /// Signed compression ratio in percent; negative when optimization
    /// increased the size.
    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    pub fn slider(&self) -> &SliderState {
        &self.slider
    }

    pub fn slider_mut(&mut self) -> &mut SliderState {
        &mut self.slider
    }

    pub fn target_format(&self) -> OutputFormat {
        self.target_format
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

fn compression_ratio_percent(original: u64, new: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - new as f64) / original as f64 * 100.0
}

fn format_label(tag: FormatTag, declared_mime: &str) -> String {
    if tag.is_image() {
        tag.label().to_string()
    } else {
        declared_mime
            .split('/')
            .nth(1)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| tag.label().to_string())
    }
}
