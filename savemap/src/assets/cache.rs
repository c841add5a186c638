//! Reuse decisions for prepared GPU assets.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::compat::assets_reusable;
use super::types::ProvinceIndex;
use super::version::{AssetVersionRecord, GameVersion};

/// Outcome of consulting the cache for a new save.
#[derive(Debug, Clone)]
pub enum AssetDecision {
    /// Installed assets can render this version. The cached province index
    /// stands in for a fresh fetch.
    Reuse {
        record: AssetVersionRecord,
        province_index: Arc<ProvinceIndex>,
    },
    /// Assets must be fetched and compiled.
    Prepare {
        previous: Option<AssetVersionRecord>,
    },
}

impl AssetDecision {
    pub fn is_reuse(&self) -> bool {
        matches!(self, Self::Reuse { .. })
    }
}

#[derive(Debug)]
struct Prepared {
    record: AssetVersionRecord,
    province_index: Arc<ProvinceIndex>,
}

/// Tracks the game version the installed GPU assets were prepared for.
///
/// The record is replaced whole, and only after a complete asset set has
/// been installed. A failed preparation leaves the previous record in place.
#[derive(Debug, Default)]
pub struct AssetVersionCache {
    prepared: RwLock<Option<Prepared>>,
}

impl AssetVersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a save of `version` can reuse the installed assets.
    pub fn decide(&self, version: GameVersion) -> AssetDecision {
        let guard = self.prepared.read();
        match guard.as_ref() {
            Some(prepared) if assets_reusable(&prepared.record, &version) => {
                debug!(
                    cached = %prepared.record,
                    version = %version,
                    "Reusing prepared map assets"
                );
                AssetDecision::Reuse {
                    record: prepared.record,
                    province_index: Arc::clone(&prepared.province_index),
                }
            }
            Some(prepared) => {
                debug!(
                    cached = %prepared.record,
                    version = %version,
                    "Map assets incompatible, preparing"
                );
                AssetDecision::Prepare {
                    previous: Some(prepared.record),
                }
            }
            None => {
                debug!(version = %version, "No prepared map assets");
                AssetDecision::Prepare { previous: None }
            }
        }
    }

    /// Record that a complete asset set for `version` is installed.
    pub fn commit(&self, version: GameVersion, province_index: Arc<ProvinceIndex>) {
        let record = version.asset_record();
        let previous = self.prepared.write().replace(Prepared {
            record,
            province_index,
        });
        info!(
            version = %record,
            previous = ?previous.map(|p| p.record),
            "Map assets prepared"
        );
    }

    /// Forget the record, forcing the next save to prepare assets.
    pub fn invalidate(&self) {
        if self.prepared.write().take().is_some() {
            debug!("Map asset record invalidated");
        }
    }

    /// Version of the installed assets, if any.
    pub fn record(&self) -> Option<AssetVersionRecord> {
        self.prepared.read().as_ref().map(|p| p.record)
    }
}
