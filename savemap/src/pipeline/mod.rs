//! Save analysis pipeline.
//!
//! [`PipelineOrchestrator`] sequences one analysis run through seven stages,
//! reporting progress and driving the [`AnalysisLifecycle`]:
//!
//! | # | Stage | Progress |
//! |---|-------|----------|
//! | 1 | Acquire bytes (file, buffer, remote) | `bytes_read` |
//! | 2 | Classify by extension, then content | `type_detected` |
//! | 3 | Engine handshake: init (memoized) + parse | poll `parse_start` → `parse_end` |
//! | 4 | Assets ∥ game data | `fetch_slice` each |
//! | 5 | Coarse pass | `coarse_pass` |
//! | 6 | Full pass ∥ render setup | `full_pass_slice`, `render_slice` |
//! | 7 | Camera, `Analyzed`, first-frame callback | |
//!
//! Stages 4 and 6 are joined with `tokio::try_join!`: neither branch waits
//! on the other and the first failure aborts both.
//!
//! [`AnalysisLifecycle`]: crate::lifecycle::AnalysisLifecycle

mod config;
mod error;
mod orchestrator;
mod outcome;
mod report;
mod stages;

pub use config::{PipelineConfig, PipelineConfigError};
pub use error::{AnalysisError, ClassificationError};
pub use orchestrator::PipelineOrchestrator;
pub use outcome::{AnalysisOutcome, RunOutcome};
pub use report::{ErrorReporter, TracingErrorReporter};
