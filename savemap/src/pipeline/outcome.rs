//! Results of an analysis run.

use std::sync::Arc;
use std::time::Duration;

use super::error::AnalysisError;
use crate::assets::GameVersion;
use crate::camera::{CameraState, WorldPoint};
use crate::engine::GameKind;

/// A successfully analyzed save.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome<M> {
    pub kind: GameKind,
    pub version: GameVersion,
    /// Metadata from the engine's full pass.
    pub meta: M,
    pub achievements: Vec<u32>,
    /// Location the camera was placed on.
    pub focus: WorldPoint,
    pub camera: CameraState,
    /// Whether previously installed map assets were reused.
    pub assets_reused: bool,
    pub input_bytes: usize,
    pub elapsed: Duration,
}

/// How a call to `run_analysis` ended.
#[derive(Debug, Clone)]
pub enum RunOutcome<M> {
    Completed(Arc<AnalysisOutcome<M>>),
    /// The run failed; the lifecycle carries the message.
    Failed(AnalysisError),
    /// Another analysis was already in flight; nothing was done.
    AlreadyRunning,
}

impl<M> RunOutcome<M> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn outcome(&self) -> Option<&Arc<AnalysisOutcome<M>>> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Failed(_) | Self::AlreadyRunning => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Completed(_) | Self::AlreadyRunning => None,
        }
    }
}
