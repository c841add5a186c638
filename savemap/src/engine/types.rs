//! Data exchanged with the parsing engine.

use bytes::Bytes;

use crate::camera::WorldPoint;

/// Per-province render colors produced by the coarse pass.
///
/// Both buffers are RGBA, one texel per render color index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceColors {
    /// Fill color.
    pub primary: Bytes,
    /// Stripe/secondary color.
    pub secondary: Bytes,
}

impl ProvinceColors {
    pub fn new(primary: impl Into<Bytes>, secondary: impl Into<Bytes>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Number of provinces described (4 bytes per texel).
    pub fn province_count(&self) -> usize {
        self.primary.len() / 4
    }
}

/// Result of the engine's full (expensive) pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FullAnalysis<M> {
    /// Engine-specific save metadata.
    pub meta: M,
    /// Achievement ids the save qualifies for.
    pub achievements: Vec<u32>,
    /// Default-selected location (e.g. the player's capital), in map pixels.
    pub focus: Option<WorldPoint>,
}
