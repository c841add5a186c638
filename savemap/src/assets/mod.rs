//! Version-keyed map assets.
//!
//! Shaders, province/terrain textures and the province color index depend
//! only on the game version a save was written with. [`AssetVersionCache`]
//! remembers which version is installed on the renderer so consecutive saves
//! of compatible versions skip fetching and compiling entirely.
//!
//! Compatibility is equality of major and minor, plus the explicit pairs in
//! [`ASSET_COMPATIBLE_MINORS`].

mod cache;
mod compat;
mod error;
mod source;
mod types;
mod version;

pub use cache::{AssetDecision, AssetVersionCache};
pub use compat::{assets_reusable, ASSET_COMPATIBLE_MINORS};
pub use error::AssetError;
pub use source::AssetSource;
pub use types::{AssetBundle, ProvinceIndex, ShaderSources, TextureBlobs};
pub use version::{AssetVersionRecord, GameVersion};
