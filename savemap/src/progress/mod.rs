//! Progress reporting for the analysis pipeline.
//!
//! Stages report progress through a [`ProgressReporter`], which stamps each
//! [`ProgressEvent`] with the time elapsed since the previous event and fans
//! it out to every registered [`ProgressSink`]. Reporting is fire-and-forget:
//! a failing sink is logged and skipped, it never aborts a stage.
//!
//! # Reporting styles
//!
//! | Style | Event | Used for |
//! |-------|-------|----------|
//! | Absolute | `BytesRead`, `TypeDetected`, `Progress` | Stages that can bound their own work |
//! | Incremental | `IncrementalProgress` | Independent fetches each adding a fixed slice |
//! | Synthetic | `StartPoll` / `EndPoll` | Opaque calls with no progress signal |
//!
//! # Synthetic polling
//!
//! ```text
//! Stage                 ProgressReporter          LifecycleProgressSink      PollTicker
//!   │ poll(20, 90)             │                            │                     │
//!   ├─────────────────────────►│ StartPoll{20 → 90}         │                     │
//!   │                          ├───────────────────────────►│ start(20, 90)       │
//!   │                          │                            ├────────────────────►│
//!   │   (opaque parse)         │                            │   +3 every 33ms     │
//!   │                          │                            │◄────────────────────┤
//!   │ drop(PollGuard)          │                            │                     │
//!   ├─────────────────────────►│ EndPoll{90}                │                     │
//!   │                          ├───────────────────────────►│ stop()              │
//!   │                          │                            ├────────────────────►│
//! ```

mod event;
mod plan;
mod reporter;
mod sink;
mod ticker;

pub use event::{ProgressEvent, ProgressKind};
pub use plan::ProgressPlan;
pub use reporter::{PollGuard, ProgressReporter};
pub use sink::{NullProgressSink, ProgressSink, SinkError, TracingProgressSink};
pub use ticker::{PollError, PollTicker, DEFAULT_TICK_INTERVAL, DEFAULT_TICK_STEP};
