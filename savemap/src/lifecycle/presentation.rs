//! What the UI should show for a given analysis state.

use super::state::AnalysisState;

/// UI-facing view of [`AnalysisState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    /// Nothing loaded; optionally an error from a cold-start failure.
    Empty { error: Option<String> },
    /// Progress overlay, either over the previous map or over a blank canvas.
    Progress { percent: f64, over_previous_map: bool },
    /// Parse finished but the renderer has not painted yet; keep the backdrop up.
    Backdrop,
    /// The map is visible, with an error indicator after a failed re-analysis.
    Map { error: Option<String> },
}

impl From<&AnalysisState> for Presentation {
    fn from(state: &AnalysisState) -> Self {
        match state {
            AnalysisState::Initial { error: None } => Self::Empty { error: None },
            AnalysisState::Initial { error: Some(failure) } if failure.recur => Self::Map {
                error: Some(failure.message.clone()),
            },
            AnalysisState::Initial { error: Some(failure) } => Self::Empty {
                error: Some(failure.message.clone()),
            },
            AnalysisState::Analyzing { percent, recur } => Self::Progress {
                percent: *percent,
                over_previous_map: *recur,
            },
            AnalysisState::Analyzed { drawn: false, .. } => Self::Backdrop,
            AnalysisState::Analyzed { drawn: true, .. } => Self::Map { error: None },
        }
    }
}
