//! Producer side of the progress protocol.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::warn;

use super::event::{ProgressEvent, ProgressKind};
use super::sink::ProgressSink;
use crate::engine::GameKind;

/// Emits progress events for one pipeline run.
///
/// Each event is stamped with the time since the previous event and handed
/// to every sink in registration order. Sink failures are logged and
/// swallowed.
pub struct ProgressReporter {
    sinks: Vec<Arc<dyn ProgressSink>>,
    last_event: Mutex<Instant>,
    poll_open: AtomicBool,
}

impl ProgressReporter {
    /// Create a reporter that fans out to `sinks`.
    pub fn new(sinks: Vec<Arc<dyn ProgressSink>>) -> Self {
        Self {
            sinks,
            last_event: Mutex::new(Instant::now()),
            poll_open: AtomicBool::new(false),
        }
    }

    /// Create a reporter with no sinks.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    /// Report that the whole input has been read.
    pub fn bytes_read(&self, bytes: u64, percent: f64) {
        self.emit(ProgressKind::BytesRead { bytes }, percent);
    }

    /// Report the detected game kind.
    pub fn type_detected(&self, kind: GameKind, percent: f64) {
        self.emit(ProgressKind::TypeDetected { kind }, percent);
    }

    /// Report an absolute checkpoint.
    pub fn checkpoint(&self, label: &'static str, percent: f64) {
        self.emit(ProgressKind::Progress { label }, percent);
    }

    /// Report a finished slice of work, adding `delta` to the total.
    pub fn increment(&self, label: &'static str, delta: f64) {
        self.emit(ProgressKind::IncrementalProgress { label }, delta);
    }

    /// Open a synthetic progress window from `start` toward `end`.
    ///
    /// The returned guard emits the matching end-poll when dropped, whether
    /// the wrapped operation succeeded, failed, or was abandoned.
    ///
    /// # Panics
    ///
    /// Panics if a poll window is already open on this reporter. Start and
    /// end must pair; nesting is a programming error.
    #[must_use = "dropping the guard ends the poll immediately"]
    pub fn poll(&self, start: f64, end: f64) -> PollGuard<'_> {
        let already_open = self.poll_open.swap(true, Ordering::SeqCst);
        assert!(
            !already_open,
            "synthetic progress poll already open; start-poll and end-poll must pair"
        );

        self.emit(ProgressKind::StartPoll { end_percent: end }, start);
        PollGuard {
            reporter: self,
            end,
        }
    }

    /// Whether a poll window is currently open.
    pub fn is_polling(&self) -> bool {
        self.poll_open.load(Ordering::SeqCst)
    }

    fn emit(&self, kind: ProgressKind, percent: f64) {
        let elapsed = {
            let mut last = self.last_event.lock();
            let now = Instant::now();
            let elapsed = now.saturating_duration_since(*last);
            *last = now;
            elapsed
        };

        let event = ProgressEvent {
            kind,
            percent,
            elapsed,
        };

        for sink in &self.sinks {
            if let Err(e) = sink.emit(&event) {
                warn!(sink = sink.name(), error = %e, "Progress sink failed, continuing");
            }
        }
    }
}

/// Closes a synthetic progress window on drop.
pub struct PollGuard<'a> {
    reporter: &'a ProgressReporter,
    end: f64,
}

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.reporter.emit(ProgressKind::EndPoll, self.end);
        self.reporter.poll_open.store(false, Ordering::SeqCst);
    }
}
