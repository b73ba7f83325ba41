//! One refresh's worth of derived state.
//!
//! A snapshot is built completely off to the side and then swapped in behind
//! an `Arc`, so readers always see vehicles, index, and RSUs from the same
//! epoch.  Nothing in it is mutated after construction.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use ts_core::{BoundingBox, GeoPoint};
use ts_entity::{RoadsideUnit, Vehicle};
use ts_index::{LodConfig, RsuIndex, SpatialIndex, ViewportQuery};
use ts_network::TrafficDataset;

use crate::CongestionZone;

/// Whether a snapshot was built from a successful provider fetch.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DataOrigin {
    Live,
    /// The fetch failed and no earlier snapshot existed.
    Synthetic,
}

pub struct Snapshot {
    pub dataset: TrafficDataset,
    pub vehicles: Vec<Vehicle>,
    pub rsus: Vec<RoadsideUnit>,
    pub index: SpatialIndex,
    pub rsu_index: RsuIndex,
    pub congestion: Vec<CongestionZone>,
    pub incidents: Vec<serde_json::Value>,
    pub origin: DataOrigin,
    /// Refresh counter that seeded this snapshot.
    pub epoch: u64,
    /// Wall-clock build time, Unix milliseconds.
    pub last_updated_ms: u64,
    pub(crate) refreshed_at: Instant,
}

impl Snapshot {
    /// Monotonic instant the snapshot was published at.
    pub fn refreshed_at(&self) -> Instant {
        self.refreshed_at
    }

    pub fn vehicles_in(&self, bounds: Option<&BoundingBox>, zoom: u8, lod: &LodConfig) -> Vec<&Vehicle> {
        ViewportQuery::new(&self.index, &self.vehicles, lod).vehicles(bounds, zoom)
    }

    /// Every RSU when `bounds` is `None`.
    pub fn rsus_in(&self, bounds: Option<&BoundingBox>) -> Vec<&RoadsideUnit> {
        match bounds {
            None => self.rsus.iter().collect(),
            Some(b) => self
                .rsu_index
                .within(b)
                .into_iter()
                .map(|i| &self.rsus[i as usize])
                .collect(),
        }
    }

    pub fn nearest_rsu(&self, pos: GeoPoint) -> Option<&RoadsideUnit> {
        self.rsu_index.nearest(pos).map(|i| &self.rsus[i as usize])
    }
}
