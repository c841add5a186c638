//! Analysis state types.

use std::fmt;

/// Last failed analysis, carried by [`AnalysisState::Initial`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFailure {
    /// Human-readable error message.
    pub message: String,
    /// Whether the failed run started over a previously displayed result.
    pub recur: bool,
}

/// UI-visible phase of save analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    /// No save loaded.
    Initial { error: Option<AnalysisFailure> },

    /// A parse is in flight.
    Analyzing {
        /// 0–100
        percent: f64,
        /// Started while a previous result was displayed.
        recur: bool,
    },

    /// Parse finished.
    Analyzed {
        recur: bool,
        /// The renderer has painted at least one frame of this result.
        drawn: bool,
    },
}

impl AnalysisState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing { .. })
    }

    /// Percent complete, only meaningful while analyzing.
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::Analyzing { percent, .. } => Some(*percent),
            Self::Initial { .. } | Self::Analyzed { .. } => None,
        }
    }

    /// Message of the last failure, if the state carries one.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Initial { error: Some(failure) } => Some(failure.message.as_str()),
            Self::Initial { error: None } | Self::Analyzing { .. } | Self::Analyzed { .. } => None,
        }
    }

    /// Whether a previously rendered map is still on screen.
    pub fn shows_previous_map(&self) -> bool {
        match self {
            Self::Initial { error } => error.as_ref().is_some_and(|f| f.recur),
            Self::Analyzing { recur, .. } => *recur,
            Self::Analyzed { .. } => true,
        }
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::Initial { error: None }
    }
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial { error: None } => write!(f, "initial"),
            Self::Initial { error: Some(e) } => write!(f, "initial (error: {})", e.message),
            Self::Analyzing { percent, recur } => {
                write!(f, "analyzing {:.0}%", percent)?;
                if *recur {
                    write!(f, " (recur)")?;
                }
                Ok(())
            }
            Self::Analyzed { drawn, .. } => {
                write!(f, "analyzed")?;
                if !*drawn {
                    write!(f, " (awaiting first frame)")?;
                }
                Ok(())
            }
        }
    }
}
