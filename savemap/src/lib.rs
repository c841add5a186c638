//! savemap - save analysis pipeline and map rendering coordinator
//!
//! Turns a game save (local file, in-memory buffer, or remote URL) into an
//! interactive, GPU-rendered world map while reporting fine-grained progress.
//!
//! The parsing engine, asset source and rendering surface are external
//! collaborators plugged in through [`engine::ParsingEngine`],
//! [`assets::AssetSource`] and [`render::RenderSurface`].
//!
//! ```ignore
//! use savemap::config::ConfigFile;
//! use savemap::input::AnalysisInput;
//! use savemap::pipeline::PipelineOrchestrator;
//!
//! let config = ConfigFile::load()?;
//! let _guard = savemap::logging::init_from_settings(&config.logging)?;
//!
//! let pipeline = PipelineOrchestrator::new(engine, detector, assets, surface, config.pipeline_config())?
//!     .with_http_remote()?;
//! let mut states = pipeline.subscribe();
//!
//! pipeline.run_analysis(AnalysisInput::file("autosave.eu4")).await;
//! ```

pub mod assets;
pub mod camera;
pub mod config;
pub mod engine;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod render;

/// Version of the savemap library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
