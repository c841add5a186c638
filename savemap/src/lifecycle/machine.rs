//! Analysis lifecycle state machine.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::presentation::Presentation;
use super::state::{AnalysisFailure, AnalysisState};

/// Owns the [`AnalysisState`] and its transitions.
///
/// Late or stale signals (percent updates outside `Analyzing`, a frame
/// callback outside `Analyzed`) are ignored. Only [`module_loaded`] treats a
/// wrong state as a programming error.
///
/// State changes are published on a `watch` channel; see [`subscribe`].
///
/// [`module_loaded`]: Self::module_loaded
/// [`subscribe`]: Self::subscribe
#[derive(Debug)]
pub struct AnalysisLifecycle {
    state: watch::Sender<AnalysisState>,
}

impl AnalysisLifecycle {
    pub fn new() -> Arc<Self> {
        let (state, _) = watch::channel(AnalysisState::default());
        Arc::new(Self { state })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AnalysisState {
        self.state.borrow().clone()
    }

    /// UI view derived from the current state.
    pub fn presentation(&self) -> Presentation {
        Presentation::from(&*self.state.borrow())
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state.subscribe()
    }

    /// Enter `Analyzing` at 0%.
    ///
    /// Returns `false` without changing anything if an analysis is already in
    /// flight.
    pub fn start_analyze(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_analyzing() {
                return false;
            }
            let recur = state.shows_previous_map();
            debug!(recur, "Analysis started");
            *state = AnalysisState::Analyzing {
                percent: 0.0,
                recur,
            };
            true
        })
    }

    /// Set the percent complete. Ignored outside `Analyzing`.
    pub fn set_percent(&self, value: f64) {
        self.state.send_if_modified(|state| match state {
            AnalysisState::Analyzing { percent, .. } => {
                let value = value.clamp(0.0, 100.0);
                if *percent == value {
                    return false;
                }
                *percent = value;
                true
            }
            AnalysisState::Initial { .. } | AnalysisState::Analyzed { .. } => false,
        });
    }

    /// Add to the percent complete. Ignored outside `Analyzing`.
    pub fn increment_percent(&self, delta: f64) {
        self.state.send_if_modified(|state| match state {
            AnalysisState::Analyzing { percent, .. } => {
                *percent = (*percent + delta).clamp(0.0, 100.0);
                true
            }
            AnalysisState::Initial { .. } | AnalysisState::Analyzed { .. } => false,
        });
    }

    /// The engine has produced a full result: enter `Analyzed`.
    ///
    /// # Panics
    ///
    /// Panics if called outside `Analyzing`.
    pub fn module_loaded(&self) {
        self.state.send_modify(|state| {
            let recur = match *state {
                AnalysisState::Analyzing { recur, .. } => recur,
                AnalysisState::Initial { .. } | AnalysisState::Analyzed { .. } => {
                    panic!("module_loaded called while {state}; only valid while analyzing")
                }
            };

            info!(recur, "Analysis complete");
            *state = AnalysisState::Analyzed {
                recur,
                drawn: false,
            };
        });
    }

    /// The renderer painted a frame. Ignored unless `Analyzed` and not yet drawn.
    pub fn mark_drawn(&self) {
        self.state.send_if_modified(|state| match state {
            AnalysisState::Analyzed { drawn, .. } if !*drawn => {
                debug!("First frame drawn");
                *drawn = true;
                true
            }
            AnalysisState::Initial { .. }
            | AnalysisState::Analyzing { .. }
            | AnalysisState::Analyzed { .. } => false,
        });
    }

    /// Return to `Initial`, recording the failure.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|state| {
            let recur = state.shows_previous_map();
            warn!(recur, error = %message, "Analysis failed");
            *state = AnalysisState::Initial {
                error: Some(AnalysisFailure { message, recur }),
            };
        });
    }
}
