//! Progress event vocabulary.

use std::fmt;
use std::time::Duration;

use crate::engine::GameKind;

/// What a progress event reports.
///
/// The set is closed: sinks match exhaustively and there is no catch-all
/// variant for "other" progress.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressKind {
    /// The full input buffer has been acquired.
    BytesRead { bytes: u64 },

    /// The save's game kind is known.
    TypeDetected { kind: GameKind },

    /// Absolute checkpoint reached by a named stage.
    Progress { label: &'static str },

    /// A unit of work finished; `percent` is added to the running total.
    IncrementalProgress { label: &'static str },

    /// An opaque operation started; a ticker may advance the display toward
    /// `end_percent` until the matching [`ProgressKind::EndPoll`].
    StartPoll { end_percent: f64 },

    /// The opaque operation resolved (successfully or not).
    EndPoll,
}

/// A single progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Event payload.
    pub kind: ProgressKind,
    /// Absolute percent, or the amount to add for incremental events.
    pub percent: f64,
    /// Time since the previous event of the same run.
    pub elapsed: Duration,
}

impl ProgressEvent {
    /// Create an event with zero elapsed time.
    pub fn new(kind: ProgressKind, percent: f64) -> Self {
        Self {
            kind,
            percent,
            elapsed: Duration::ZERO,
        }
    }

    /// Whether `percent` is a delta rather than an absolute position.
    pub fn is_incremental(&self) -> bool {
        matches!(self.kind, ProgressKind::IncrementalProgress { .. })
    }

    /// Elapsed time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ProgressKind::BytesRead { bytes } => write!(
                f,
                "read {:.1} MB ({}ms) [{:.0}%]",
                *bytes as f64 / 1_000_000.0,
                self.elapsed_ms(),
                self.percent
            ),
            ProgressKind::TypeDetected { kind } => write!(
                f,
                "detected {} save ({}ms) [{:.0}%]",
                kind,
                self.elapsed_ms(),
                self.percent
            ),
            ProgressKind::Progress { label } => {
                write!(f, "{} ({}ms) [{:.0}%]", label, self.elapsed_ms(), self.percent)
            }
            ProgressKind::IncrementalProgress { label } => write!(
                f,
                "{} ({}ms) [+{:.1}%]",
                label,
                self.elapsed_ms(),
                self.percent
            ),
            ProgressKind::StartPoll { end_percent } => {
                write!(f, "waiting [{:.0}% → {:.0}%]", self.percent, end_percent)
            }
            ProgressKind::EndPoll => {
                write!(f, "wait finished ({}ms) [{:.0}%]", self.elapsed_ms(), self.percent)
            }
        }
    }
}
