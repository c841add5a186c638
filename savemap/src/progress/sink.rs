//! Progress sinks.

use thiserror::Error;
use tracing::{debug, info};

use super::event::{ProgressEvent, ProgressKind};
use super::ticker::PollError;

/// Errors a sink may return while consuming an event.
///
/// The reporter logs these and moves on; they never reach the pipeline.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The synthetic ticker could not be started.
    #[error("progress ticker error: {0}")]
    Poll(#[from] PollError),

    /// The sink refused the event.
    #[error("progress sink rejected event: {0}")]
    Rejected(String),
}

/// Consumer of pipeline progress events.
///
/// Implementations must be fast and non-blocking: `emit` is called inline
/// from pipeline stages.
pub trait ProgressSink: Send + Sync {
    /// Name used when logging sink failures.
    fn name(&self) -> &str {
        "progress-sink"
    }

    /// Consume one event.
    fn emit(&self, event: &ProgressEvent) -> Result<(), SinkError>;
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn name(&self) -> &str {
        "null"
    }

    fn emit(&self, _event: &ProgressEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Human-readable progress log backed by `tracing`.
///
/// Milestones are logged at info level; ticker bookkeeping at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn emit(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        match &event.kind {
            ProgressKind::BytesRead { bytes } => {
                info!(bytes, elapsed_ms = event.elapsed_ms(), "{}", event);
            }
            ProgressKind::TypeDetected { kind } => {
                info!(kind = %kind, elapsed_ms = event.elapsed_ms(), "{}", event);
            }
            ProgressKind::Progress { label } | ProgressKind::IncrementalProgress { label } => {
                info!(stage = *label, elapsed_ms = event.elapsed_ms(), "{}", event);
            }
            ProgressKind::StartPoll { .. } | ProgressKind::EndPoll => {
                debug!(elapsed_ms = event.elapsed_ms(), "{}", event);
            }
        }
        Ok(())
    }
}
