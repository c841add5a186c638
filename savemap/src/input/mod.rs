//! Save input acquisition.
//!
//! Turns an [`AnalysisInput`] (a local file, an in-memory buffer, or a
//! remote URL) into the complete byte buffer the engine parses. Size limits
//! are enforced for every source and acquisition can be cancelled through
//! the run's `CancellationToken`.

mod acquire;
mod remote;

use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;

pub use acquire::{AcquiredInput, InputAcquirer};
pub use remote::{RemoteFetcher, ReqwestFetcher};

/// What the caller asked to analyze.
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    /// A save on the local filesystem.
    File(PathBuf),
    /// A buffer already in memory, with the file name it came from if known.
    Bytes { name: Option<String>, data: Bytes },
    /// A save hosted remotely.
    Remote { url: String, name: Option<String> },
}

impl AnalysisInput {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::Bytes {
            name: Some(name.into()),
            data: data.into(),
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote {
            url: url.into(),
            name: None,
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Bytes { name: Some(name), .. } => name.clone(),
            Self::Bytes { name: None, data } => format!("<{} bytes>", data.len()),
            Self::Remote { url, .. } => url.clone(),
        }
    }
}

/// Errors acquiring the input buffer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    /// The file could not be opened or read.
    #[error("unable to read {path}: {message}")]
    Unreadable { path: String, message: String },

    /// The input holds no bytes.
    #[error("save file is empty")]
    Empty,

    /// The input exceeds the configured limit.
    #[error("save file is too large ({size} bytes, limit is {limit} bytes)")]
    Oversized { size: u64, limit: u64 },

    /// The user cancelled acquisition.
    #[error("save upload cancelled")]
    Cancelled,

    /// The remote fetch failed.
    #[error("failed to download {url}: {message}")]
    Remote { url: String, message: String },

    /// A remote input was given but no fetcher is configured.
    #[error("remote saves are not supported by this pipeline")]
    RemoteUnsupported,
}
