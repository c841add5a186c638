//! Pipeline error taxonomy.

use thiserror::Error;

use crate::assets::AssetError;
use crate::engine::EngineError;
use crate::input::InputError;
use crate::render::RenderError;

/// The save's game could not be determined.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassificationError {
    /// Neither the file name nor the content identified a supported game.
    #[error("unrecognized save file{}", quoted_name(.name))]
    Unrecognized { name: Option<String> },

    /// The content detector failed to load.
    #[error("save type detection unavailable: {0}")]
    DetectorUnavailable(EngineError),
}

fn quoted_name(name: &Option<String>) -> String {
    name.as_deref()
        .map(|n| format!(" '{n}'"))
        .unwrap_or_default()
}

/// A failed analysis run.
///
/// Each variant wraps the error of one stage category and displays it
/// unchanged, so the lifecycle shows the underlying message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    RenderSetup(#[from] RenderError),

    /// A query needed a parsed save but none is loaded.
    #[error("no save is loaded")]
    NoSaveLoaded,
}

impl AnalysisError {
    /// Category name for logs and error capture.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Classification(_) => "classification",
            Self::Engine(_) => "engine",
            Self::Asset(_) => "asset",
            Self::RenderSetup(_) => "render_setup",
            Self::NoSaveLoaded => "no_save",
        }
    }

    /// Whether the user cancelled the input.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Input(InputError::Cancelled))
    }
}
