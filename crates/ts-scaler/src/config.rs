//! Scaler configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! overrides:
//!
//! ```json
//! { "target_population": 250000, "seed": 7, "grid": { "rows": 30, "cols": 30 } }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ts_core::BoundingBox;
use ts_entity::{CategoryTable, DEFAULT_MIN_SPEED_KMH, RsuConfig};
use ts_index::LodConfig;
use ts_network::GridConfig;

use crate::{CongestionConfig, ScalerError, ScalerResult};

/// Default service region: greater Bengaluru.
pub const DEFAULT_REGION: BoundingBox = BoundingBox { north: 13.10, south: 12.85, east: 77.75, west: 77.45 };

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    /// Vehicles materialized per refresh.  At most `u32::MAX`.
    pub target_population: usize,

    /// Master seed.  Refresh `k` uses `ScalerRng::epoch_seed(seed, k)`.
    pub seed: u64,

    /// How long a snapshot stays fresh.
    pub cache_duration_ms: u64,

    pub region: BoundingBox,
    pub grid: GridConfig,
    pub categories: CategoryTable,
    pub rsu: RsuConfig,

    /// Edge length of a spatial-index cell, in degrees.
    pub index_cell_deg: f64,

    pub lod: LodConfig,
    pub min_vehicle_speed_kmh: f64,
    pub congestion: CongestionConfig,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            target_population:     1_000_000,
            seed:                  42,
            cache_duration_ms:     60_000,
            region:                DEFAULT_REGION,
            grid:                  GridConfig::default(),
            categories:            CategoryTable::default(),
            rsu:                   RsuConfig::default(),
            index_cell_deg:        0.01,
            lod:                   LodConfig::default(),
            min_vehicle_speed_kmh: DEFAULT_MIN_SPEED_KMH,
            congestion:            CongestionConfig::default(),
        }
    }
}

impl ScalerConfig {
    pub fn from_json_str(s: &str) -> ScalerResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> ScalerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_millis(self.cache_duration_ms)
    }

    /// Check every knob.  Called by [`ScalerBuilder::build`](crate::ScalerBuilder::build).
    pub fn validate(&self) -> ScalerResult<()> {
        self.region.validate()?;
        self.grid.validate()?;
        self.categories.validate()?;
        self.rsu.validate()?;
        self.lod.validate()?;
        self.congestion.validate()?;

        if !(ts_index::grid::MIN_CELL_DEG..=ts_index::grid::MAX_CELL_DEG).contains(&self.index_cell_deg) {
            return Err(ScalerError::Config(format!(
                "index_cell_deg must be in [{}, {}], got {}",
                ts_index::grid::MIN_CELL_DEG,
                ts_index::grid::MAX_CELL_DEG,
                self.index_cell_deg
            )));
        }
        if !(self.min_vehicle_speed_kmh > 0.0) || !self.min_vehicle_speed_kmh.is_finite() {
            return Err(ScalerError::Config(format!(
                "min_vehicle_speed_kmh must be positive, got {}",
                self.min_vehicle_speed_kmh
            )));
        }
        if u32::try_from(self.target_population).is_err() {
            return Err(ScalerError::Config(format!(
                "target_population must fit the u32 vehicle id space, got {}",
                self.target_population
            )));
        }
        if self.cache_duration_ms == 0 {
            return Err(ScalerError::Config("cache_duration_ms must be positive".into()));
        }
        Ok(())
    }
}
