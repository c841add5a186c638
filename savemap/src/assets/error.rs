//! Asset fetch errors.

use thiserror::Error;

use super::version::GameVersion;

/// Errors raised while fetching version-specific assets.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssetError {
    /// No assets are published for this version.
    #[error("no map assets for version {0}")]
    UnsupportedVersion(GameVersion),

    /// The asset request failed.
    #[error("failed to fetch {asset}: {message}")]
    Fetch { asset: &'static str, message: String },

    /// The asset arrived but could not be decoded.
    #[error("invalid {asset}: {message}")]
    Invalid { asset: &'static str, message: String },
}

impl AssetError {
    pub fn fetch(asset: &'static str, message: impl Into<String>) -> Self {
        Self::Fetch {
            asset,
            message: message.into(),
        }
    }
}
