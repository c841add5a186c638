//! Analysis lifecycle.
//!
//! ```text
//!            start_analyze              module_loaded
//!  Initial ───────────────► Analyzing ───────────────► Analyzed{drawn: false}
//!    ▲                        │  ▲                         │ mark_drawn
//!    │          fail          │  │ start_analyze (recur)   ▼
//!    └────────────────────────┘  └──────────────────── Analyzed{drawn: true}
//! ```
//!
//! [`AnalysisLifecycle`] is the only writer of [`AnalysisState`].
//! [`LifecycleProgressSink`] feeds pipeline progress into the percent and
//! [`Presentation`] maps a state to what the UI shows.

mod machine;
mod presentation;
mod sink;
mod state;

pub use machine::AnalysisLifecycle;
pub use presentation::Presentation;
pub use sink::LifecycleProgressSink;
pub use state::{AnalysisFailure, AnalysisState};
