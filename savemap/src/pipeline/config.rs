//! Runtime pipeline settings.

use std::time::Duration;

use thiserror::Error;

use crate::config::{DEFAULT_MAX_FILE_SIZE, DEFAULT_REMOTE_TIMEOUT_SECS};
use crate::progress::ProgressPlan;

/// Settings rejected when building a [`PipelineOrchestrator`](super::PipelineOrchestrator).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineConfigError {
    #[error("invalid progress plan: {0}")]
    Progress(String),

    #[error("max input size must be greater than zero")]
    ZeroMaxInput,

    #[error("remote timeout must be greater than zero")]
    ZeroRemoteTimeout,
}

/// Settings for a [`PipelineOrchestrator`](super::PipelineOrchestrator).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Largest input accepted, in bytes.
    pub max_input_bytes: u64,
    /// Timeout for remote downloads.
    pub remote_timeout: Duration,
    /// Progress milestones and ticker pacing.
    pub progress: ProgressPlan,
}

impl PipelineConfig {
    pub fn with_max_input_bytes(mut self, max: u64) -> Self {
        self.max_input_bytes = max;
        self
    }

    pub fn with_progress(mut self, plan: ProgressPlan) -> Self {
        self.progress = plan;
        self
    }

    /// Check for settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineConfigError> {
        if self.max_input_bytes == 0 {
            return Err(PipelineConfigError::ZeroMaxInput);
        }
        if self.remote_timeout.is_zero() {
            return Err(PipelineConfigError::ZeroRemoteTimeout);
        }
        self.progress
            .validate()
            .map_err(PipelineConfigError::Progress)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_FILE_SIZE,
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            progress: ProgressPlan::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(PipelineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let config = PipelineConfig::default().with_progress(ProgressPlan {
            tick_interval: Duration::ZERO,
            ..ProgressPlan::default()
        });

        assert!(matches!(
            config.validate(),
            Err(PipelineConfigError::Progress(_))
        ));
    }

    #[test]
    fn test_zero_remote_timeout_rejected() {
        let config = PipelineConfig {
            remote_timeout: Duration::ZERO,
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(PipelineConfigError::ZeroRemoteTimeout)
        );
    }

    #[test]
    fn test_zero_max_input_rejected() {
        let config = PipelineConfig::default().with_max_input_bytes(0);
        assert_eq!(config.validate(), Err(PipelineConfigError::ZeroMaxInput));
    }
}
