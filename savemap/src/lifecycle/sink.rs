//! Progress sink driving the lifecycle percent.

use std::sync::Arc;

use crate::progress::{PollTicker, ProgressEvent, ProgressKind, ProgressSink, SinkError};

use super::machine::AnalysisLifecycle;

/// Applies progress events to [`AnalysisLifecycle`]'s percent.
///
/// Owns the synthetic ticker: a start-poll starts it, an end-poll stops it.
/// The end-poll does not move the percent; the next checkpoint does.
pub struct LifecycleProgressSink {
    lifecycle: Arc<AnalysisLifecycle>,
    ticker: PollTicker,
}

impl LifecycleProgressSink {
    pub fn new(lifecycle: Arc<AnalysisLifecycle>, ticker: PollTicker) -> Self {
        Self { lifecycle, ticker }
    }

    /// Whether the synthetic ticker is running.
    pub fn is_polling(&self) -> bool {
        self.ticker.is_active()
    }
}

impl ProgressSink for LifecycleProgressSink {
    fn name(&self) -> &str {
        "lifecycle"
    }

    fn emit(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        match event.kind {
            ProgressKind::IncrementalProgress { .. } => {
                self.lifecycle.increment_percent(event.percent);
            }
            ProgressKind::StartPoll { end_percent } => {
                self.lifecycle.set_percent(event.percent);
                let lifecycle = Arc::clone(&self.lifecycle);
                self.ticker
                    .start(event.percent, end_percent, move |percent| {
                        lifecycle.set_percent(percent)
                    })?;
            }
            ProgressKind::EndPoll => {
                self.ticker.stop();
            }
            ProgressKind::BytesRead { .. }
            | ProgressKind::TypeDetected { .. }
            | ProgressKind::Progress { .. } => {
                self.lifecycle.set_percent(event.percent);
            }
        }
        Ok(())
    }
}
