//! Road-network synthesis from sparse telemetry.
//!
//! # Fallback contract
//!
//! [`RoadNetworkSynthesizer::synthesize`] never fails.  Consecutive telemetry
//! samples become segments; if fewer than `min_segments` usable segments
//! result (empty feed, malformed coordinates, degenerate speeds), the real
//! segments are discarded and a uniform grid covering the target region is
//! produced instead.  A validated [`GridConfig`] guarantees that grid has at
//! least `min_segments` segments.
//!
//! # Grid layout
//!
//! `rows × cols` cells over the region.  Each cell contributes one horizontal
//! segment along its southern edge and one vertical segment along its western
//! edge, so the grid always has exactly `2 · rows · cols` segments and every
//! segment lies inside the region.

use log::{debug, warn};

use ts_core::{BoundingBox, GeoPoint, ScalerRng};

use crate::segment::{DatasetBuilder, SegmentOrigin, TrafficDataset, congestion_level};
use crate::{NetworkError, NetworkResult};

/// Pairs shorter than this are treated as duplicate samples.
const MIN_SEGMENT_KM: f64 = 0.001;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// One provider reading: a polyline of samples sharing a speed pair.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetrySnapshot {
    pub samples: Vec<GeoPoint>,
    /// km/h
    pub free_flow_speed: f64,
    /// km/h
    pub current_speed: f64,
}

impl TelemetrySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Synthetic-grid parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    /// Below this many telemetry segments the grid replaces them.
    pub min_segments: usize,
    pub congestion_min: f64,
    pub congestion_max: f64,
    /// km/h
    pub free_flow_min: f64,
    /// km/h
    pub free_flow_max: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows:           20,
            cols:           20,
            min_segments:   100,
            congestion_min: 5.0,
            congestion_max: 95.0,
            free_flow_min:  30.0,
            free_flow_max:  90.0,
        }
    }
}

impl GridConfig {
    /// Number of segments the synthetic grid produces.
    pub fn grid_segment_count(&self) -> usize {
        2 * self.rows as usize * self.cols as usize
    }

    pub fn validate(&self) -> NetworkResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(NetworkError::Config(format!(
                "grid must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.min_segments == 0 {
            return Err(NetworkError::Config("min_segments must be at least 1".into()));
        }
        if self.grid_segment_count() < self.min_segments {
            return Err(NetworkError::Config(format!(
                "{}x{} grid yields {} segments, below min_segments {}",
                self.rows,
                self.cols,
                self.grid_segment_count(),
                self.min_segments
            )));
        }
        if !(0.0..=100.0).contains(&self.congestion_min)
            || !(0.0..=100.0).contains(&self.congestion_max)
            || self.congestion_min > self.congestion_max
        {
            return Err(NetworkError::Config(format!(
                "congestion range [{}, {}] must be ordered and within [0, 100]",
                self.congestion_min, self.congestion_max
            )));
        }
        if !(self.free_flow_min > 0.0)
            || !self.free_flow_max.is_finite()
            || self.free_flow_min > self.free_flow_max
        {
            return Err(NetworkError::Config(format!(
                "free-flow range [{}, {}] must be positive and ordered",
                self.free_flow_min, self.free_flow_max
            )));
        }
        Ok(())
    }
}

// ── Synthesizer ───────────────────────────────────────────────────────────────

pub struct RoadNetworkSynthesizer {
    config: GridConfig,
}

impl RoadNetworkSynthesizer {
    /// Fails only on an invalid [`GridConfig`].
    pub fn new(config: GridConfig) -> NetworkResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Produce an unallocated dataset from `telemetry`, falling back to a grid
    /// over `region` when telemetry yields too few segments.
    pub fn synthesize(
        &self,
        telemetry: &TelemetrySnapshot,
        region: &BoundingBox,
        rng: &mut ScalerRng,
    ) -> TrafficDataset {
        let real = segments_from_samples(telemetry);
        if real.segment_count() >= self.config.min_segments {
            debug!("synthesized {} segments from telemetry", real.segment_count());
            return real.build(SegmentOrigin::Telemetry);
        }

        warn!(
            "telemetry yielded {} segments (< {}); using {}x{} synthetic grid",
            real.segment_count(),
            self.config.min_segments,
            self.config.rows,
            self.config.cols
        );
        self.synthetic_grid(region, rng)
    }

    /// Uniform grid over `region` with random congestion and free-flow speed.
    pub fn synthetic_grid(&self, region: &BoundingBox, rng: &mut ScalerRng) -> TrafficDataset {
        let cfg = &self.config;
        let lat_step = region.lat_span() / cfg.rows as f64;
        let lng_step = region.lng_span() / cfg.cols as f64;

        let mut b = DatasetBuilder::with_capacity(cfg.grid_segment_count());
        for r in 0..cfg.rows {
            for c in 0..cfg.cols {
                let lat = region.south + r as f64 * lat_step;
                let lng = region.west + c as f64 * lng_step;
                let corner = GeoPoint::new(lat, lng);

                // Computed from the row/col index rather than by accumulation so
                // the far edge lands exactly on the region boundary.
                let east = GeoPoint::new(lat, region.west + (c + 1) as f64 * lng_step);
                let north = GeoPoint::new(region.south + (r + 1) as f64 * lat_step, lng);

                let (congestion, free_flow) = self.random_conditions(rng);
                b.add_segment(corner, clamp_to(east, region), congestion, free_flow);

                let (congestion, free_flow) = self.random_conditions(rng);
                b.add_segment(corner, clamp_to(north, region), congestion, free_flow);
            }
        }
        b.build(SegmentOrigin::SyntheticGrid)
    }

    fn random_conditions(&self, rng: &mut ScalerRng) -> (f64, f64) {
        let cfg = &self.config;
        let congestion = rng.gen_range(cfg.congestion_min..=cfg.congestion_max);
        let free_flow = rng.gen_range(cfg.free_flow_min..=cfg.free_flow_max);
        (congestion, free_flow)
    }
}

/// Walk consecutive sample pairs.  Returns an empty builder for unusable
/// speed pairs; skips pairs with invalid or coincident endpoints.
fn segments_from_samples(telemetry: &TelemetrySnapshot) -> DatasetBuilder {
    let Some(congestion) = congestion_level(telemetry.free_flow_speed, telemetry.current_speed)
    else {
        if !telemetry.samples.is_empty() {
            warn!(
                "discarding {} samples with unusable speeds (free-flow {}, current {})",
                telemetry.samples.len(),
                telemetry.free_flow_speed,
                telemetry.current_speed
            );
        }
        return DatasetBuilder::new();
    };

    let mut b = DatasetBuilder::with_capacity(telemetry.samples.len().saturating_sub(1));
    let mut skipped = 0usize;
    for pair in telemetry.samples.windows(2) {
        let (a, z) = (pair[0], pair[1]);
        if !a.is_valid() || !z.is_valid() || a.distance_km(z) < MIN_SEGMENT_KM {
            skipped += 1;
            continue;
        }
        b.add_segment(a, z, congestion, telemetry.free_flow_speed);
    }
    if skipped > 0 {
        debug!("skipped {skipped} malformed sample pairs");
    }
    b
}

#[inline]
fn clamp_to(p: GeoPoint, region: &BoundingBox) -> GeoPoint {
    GeoPoint::new(
        p.lat.max(region.south).min(region.north),
        p.lng.max(region.west).min(region.east),
    )
}
