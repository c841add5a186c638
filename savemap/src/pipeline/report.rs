//! Error capture for failed runs.

use tracing::error;

use super::error::AnalysisError;

/// Receives every error that ends an analysis run.
pub trait ErrorReporter: Send + Sync {
    fn capture(&self, error: &AnalysisError);
}

/// Logs captured errors through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn capture(&self, err: &AnalysisError) {
        error!(category = err.category(), error = %err, "Save analysis failed");
    }
}
