//! Parsing engine collaborators.
//!
//! The engine itself is external (a compiled module running in an isolated
//! worker). This module defines the seams the pipeline drives it through:
//!
//! - [`ParsingEngine`]: parse, version query, coarse/full passes, melt
//! - [`TypeDetector`]: content-based game detection
//! - [`InitGate`]: per-kind memoized initialization
//! - [`SaveSlot`]: the single resident parsed save

mod error;
mod kind;
mod registry;
mod slot;
mod traits;
mod types;

pub use error::EngineError;
pub use kind::GameKind;
pub use registry::InitGate;
pub use slot::SaveSlot;
pub use traits::{ParsingEngine, TypeDetector};
pub use types::{FullAnalysis, ProvinceColors};
