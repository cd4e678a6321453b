//! Transport boundary for optimization requests.

use async_trait::async_trait;
use optipress_core::{OptimizationRequest, OptimizationResult, TransportError};

/// Boundary call that carries an optimization request to wherever the
/// transcode engine runs (an HTTP endpoint in the reference deployment, an
/// in-process async call in embedded ones).
///
/// The implementation is responsible for bounding request latency; the
/// session enforces no timeout of its own.
#[async_trait]
pub trait OptimizeTransport: Send + Sync {
    async fn submit_optimization(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, TransportError>;
}
