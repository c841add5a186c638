//! Version-specific rendering assets.

use std::collections::HashMap;

use bytes::Bytes;

/// Shader program sources for one map version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    /// Source text keyed by shader name (e.g. `"map.vert"`).
    pub sources: HashMap<String, String>,
}

/// Encoded province and terrain textures for one map version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBlobs {
    /// Encoded image data keyed by texture name (e.g. `"provinces1"`).
    pub blobs: HashMap<String, Bytes>,
}

impl TextureBlobs {
    /// Total encoded size in bytes.
    pub fn total_bytes(&self) -> usize {
        self.blobs.values().map(Bytes::len).sum()
    }
}

/// Mapping from province id to render color index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProvinceIndex {
    indices: Vec<u16>,
}

impl ProvinceIndex {
    pub fn new(indices: Vec<u16>) -> Self {
        Self { indices }
    }

    /// Render color index of a province.
    pub fn color_index(&self, province_id: usize) -> Option<u16> {
        self.indices.get(province_id).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.indices
    }
}

/// Everything the renderer compiles a program set from.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    pub shaders: ShaderSources,
    pub textures: TextureBlobs,
}
