//! Asset compatibility between game versions.

use super::version::{AssetVersionRecord, GameVersion};

/// Minor versions of the same major that ship identical map art.
///
/// Pairs are matched in either order. Entries are authoring decisions, not
/// numeric adjacency; only add one when the art is known to be identical.
pub const ASSET_COMPATIBLE_MINORS: &[(u16, u16)] = &[(31, 32)];

/// Whether assets prepared for `previous` can render a save of `version`.
pub fn assets_reusable(previous: &AssetVersionRecord, version: &GameVersion) -> bool {
    if previous.major != version.major {
        return false;
    }

    if previous.minor == version.minor {
        return true;
    }

    ASSET_COMPATIBLE_MINORS.iter().any(|&(a, b)| {
        (a == previous.minor && b == version.minor) || (b == previous.minor && a == version.minor)
    })
}
