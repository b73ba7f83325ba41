//! Roadside-unit placement on major roads.
//!
//! # Algorithm
//!
//! ```text
//! target  = max(1, floor(total_length_km / density_km_per_rsu))
//! for segment in major segments (free-flow > threshold), longest first:
//!     slots = max(1, floor(0.8 · length / min_separation))
//!     for j in 0..slots:
//!         t = 0.1 + 0.8 · (j + 0.5) / slots        # skip the outer 10 % at each end
//!         place at point_at(t) if ≥ min_separation from every placed RSU
//!         stop once target is reached
//! ```
//!
//! The separation check is a linear haversine scan over prior placements,
//! which is fine for the hundreds of RSUs a metro area needs.

use log::debug;

use ts_core::{GeoPoint, RsuId, ScalerRng, SegmentId, normalize_heading};
use ts_network::TrafficDataset;

use crate::{EntityError, EntityResult};

/// Fraction of each end of a segment kept free of RSUs.
const END_MARGIN: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RsuConfig {
    /// Segments with free-flow speed above this (km/h) are major roads.
    pub major_road_speed_kmh: f64,
    /// Kilometres of road per RSU.
    pub density_km_per_rsu: f64,
    pub min_separation_km: f64,
    pub coverage_radius_m: f64,
    /// Probability a placed unit reports `Active`.
    pub active_ratio: f64,
}

impl Default for RsuConfig {
    fn default() -> Self {
        Self {
            major_road_speed_kmh: 50.0,
            density_km_per_rsu:   5.0,
            min_separation_km:    1.0,
            coverage_radius_m:    500.0,
            active_ratio:         0.9,
        }
    }
}

impl RsuConfig {
    pub fn validate(&self) -> EntityResult<()> {
        if !(self.density_km_per_rsu > 0.0) || !self.density_km_per_rsu.is_finite() {
            return Err(EntityError::Config(format!(
                "RSU density must be positive, got {}",
                self.density_km_per_rsu
            )));
        }
        if !(self.min_separation_km > 0.0) || !self.min_separation_km.is_finite() {
            return Err(EntityError::Config(format!(
                "RSU minimum separation must be positive, got {}",
                self.min_separation_km
            )));
        }
        if !(self.coverage_radius_m >= 0.0) {
            return Err(EntityError::Config(format!(
                "RSU coverage radius must be non-negative, got {}",
                self.coverage_radius_m
            )));
        }
        if !(0.0..=1.0).contains(&self.active_ratio) {
            return Err(EntityError::Config(format!(
                "RSU active ratio must be within [0, 1], got {}",
                self.active_ratio
            )));
        }
        Ok(())
    }

    /// Number of RSUs to place for `total_length_km` of road.
    pub fn target_count(&self, total_length_km: f64) -> usize {
        ((total_length_km / self.density_km_per_rsu).floor() as usize).max(1)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RsuStatus {
    Active,
    Inactive,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadsideUnit {
    pub id: RsuId,
    pub position: GeoPoint,
    pub coverage_radius_m: f64,
    pub status: RsuStatus,
    /// Bearing of the host segment.
    pub heading: f64,
    pub segment: SegmentId,
}

/// Place RSUs on the major roads of `dataset`.
///
/// Every pair of returned units is at least `min_separation_km` apart.
pub fn place_rsus(
    dataset: &TrafficDataset,
    config: &RsuConfig,
    rng: &mut ScalerRng,
) -> Vec<RoadsideUnit> {
    let target = config.target_count(dataset.total_length_km);
    let major = dataset.major_segments(config.major_road_speed_kmh);
    let mut placed: Vec<RoadsideUnit> = Vec::with_capacity(target.min(4_096));

    'segments: for segment in &major {
        let usable_km = segment.length_km * (1.0 - 2.0 * END_MARGIN);
        let slots = ((usable_km / config.min_separation_km).floor() as usize).max(1);
        let heading = normalize_heading(segment.bearing_deg());

        for j in 0..slots {
            if placed.len() >= target {
                break 'segments;
            }
            let t = END_MARGIN + (1.0 - 2.0 * END_MARGIN) * (j as f64 + 0.5) / slots as f64;
            let candidate = segment.point_at(t);

            let clear = placed
                .iter()
                .all(|r| r.position.distance_km(candidate) >= config.min_separation_km);
            if !clear {
                continue;
            }

            let status = if rng.gen_bool(config.active_ratio) {
                RsuStatus::Active
            } else {
                RsuStatus::Inactive
            };
            placed.push(RoadsideUnit {
                id: RsuId(placed.len() as u32),
                position: candidate,
                coverage_radius_m: config.coverage_radius_m,
                status,
                heading,
                segment: segment.id,
            });
        }
    }

    debug!(
        "placed {} of {} target RSUs on {} major segments",
        placed.len(),
        target,
        major.len()
    );
    placed
}
