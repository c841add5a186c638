//! Where version-specific assets come from.

use std::future::Future;

use bytes::Bytes;

use super::error::AssetError;
use super::types::{ProvinceIndex, ShaderSources, TextureBlobs};
use super::version::GameVersion;

/// Fetches map assets and auxiliary game data for a game version.
///
/// Implementations usually sit on top of HTTP or a bundled asset directory.
/// Every fetch is independent; the pipeline runs them concurrently.
pub trait AssetSource: Send + Sync {
    fn fetch_shaders(
        &self,
        version: GameVersion,
    ) -> impl Future<Output = Result<ShaderSources, AssetError>> + Send;

    fn fetch_textures(
        &self,
        version: GameVersion,
    ) -> impl Future<Output = Result<TextureBlobs, AssetError>> + Send;

    fn fetch_province_index(
        &self,
        version: GameVersion,
    ) -> impl Future<Output = Result<ProvinceIndex, AssetError>> + Send;

    /// Version-specific game data the engine's coarse pass needs.
    fn fetch_game_data(
        &self,
        version: GameVersion,
    ) -> impl Future<Output = Result<Bytes, AssetError>> + Send;
}
