//! Game and asset versions.

use std::fmt;

/// Game version declared by a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl GameVersion {
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The part of the version that selects map assets.
    pub fn asset_record(&self) -> AssetVersionRecord {
        AssetVersionRecord {
            major: self.major,
            minor: self.minor,
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Last game version for which GPU assets were fully prepared.
///
/// Patch releases never change map art, so only major and minor are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetVersionRecord {
    pub major: u16,
    pub minor: u16,
}

impl fmt::Display for AssetVersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
