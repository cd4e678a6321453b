//! Optipress session: the client-facing optimization state machine and the
//! before/after comparison slider controller.

pub mod session;
pub mod slider;
pub mod transport;

pub use session::{OptimizationSession, PendingOptimize, PreviewInfo, SessionPhase};
pub use slider::{ListenerHost, SliderController, SourceKind};
pub use transport::OptimizeTransport;
