//! Vehicle materialization along allocated segments.
//!
//! For every segment, `vehicle_quota` vehicles are drawn from that segment's
//! own [`SegmentRng`], and vehicle ids are assigned from the running prefix
//! sum of quotas.  Both depend only on `(refresh_seed, segment)`, so the
//! `parallel` feature produces byte-identical output to the sequential path.

use log::debug;

use ts_core::{SegmentRng, VehicleId, normalize_heading};
use ts_network::{RoadSegment, TrafficDataset};

use crate::{CategoryTable, EntityError, EntityResult, Vehicle, VehicleStatus};

/// Default floor for generated speeds, km/h.
pub const DEFAULT_MIN_SPEED_KMH: f64 = 5.0;

pub struct EntityGenerator {
    categories: CategoryTable,
    min_speed_kmh: f64,
}

impl EntityGenerator {
    /// Validates the category table and speed floor.
    pub fn new(categories: CategoryTable, min_speed_kmh: f64) -> EntityResult<Self> {
        categories.validate()?;
        if !(min_speed_kmh > 0.0) || !min_speed_kmh.is_finite() {
            return Err(EntityError::Config(format!(
                "minimum vehicle speed must be positive, got {min_speed_kmh}"
            )));
        }
        Ok(Self { categories, min_speed_kmh })
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Materialize `Σ vehicle_quota` vehicles, in segment order.
    pub fn generate_vehicles(
        &self,
        dataset: &TrafficDataset,
        refresh_seed: u64,
        generated_at_ms: u64,
    ) -> Vec<Vehicle> {
        let mut first_ids = Vec::with_capacity(dataset.segments.len());
        let mut next = 0u32;
        for s in &dataset.segments {
            first_ids.push(next);
            next = next.saturating_add(s.vehicle_quota as u32);
        }

        let vehicles = self.generate_all(&dataset.segments, &first_ids, refresh_seed, generated_at_ms);
        debug!(
            "generated {} vehicles over {} segments",
            vehicles.len(),
            dataset.segments.len()
        );
        vehicles
    }

    #[cfg(not(feature = "parallel"))]
    fn generate_all(
        &self,
        segments: &[RoadSegment],
        first_ids: &[u32],
        refresh_seed: u64,
        generated_at_ms: u64,
    ) -> Vec<Vehicle> {
        let total: usize = segments.iter().map(|s| s.vehicle_quota).sum();
        let mut out = Vec::with_capacity(total);
        for (segment, &first) in segments.iter().zip(first_ids) {
            out.extend(self.segment_vehicles(segment, first, refresh_seed, generated_at_ms));
        }
        out
    }

    #[cfg(feature = "parallel")]
    fn generate_all(
        &self,
        segments: &[RoadSegment],
        first_ids: &[u32],
        refresh_seed: u64,
        generated_at_ms: u64,
    ) -> Vec<Vehicle> {
        use rayon::prelude::*;

        segments
            .par_iter()
            .zip(first_ids.par_iter())
            .flat_map_iter(|(segment, &first)| {
                self.segment_vehicles(segment, first, refresh_seed, generated_at_ms)
            })
            .collect()
    }

    /// Vehicles for one segment.
    pub fn segment_vehicles(
        &self,
        segment: &RoadSegment,
        first_id: u32,
        refresh_seed: u64,
        generated_at_ms: u64,
    ) -> Vec<Vehicle> {
        let mut rng = SegmentRng::new(refresh_seed, segment.id);
        let heading = normalize_heading(segment.bearing_deg());
        let speed_kmh = segment.current_speed.max(self.min_speed_kmh);

        (0..segment.vehicle_quota)
            .map(|k| {
                let position = segment.point_at(rng.unit());
                let profile = self.categories.sample(&mut rng);
                let trust_score = rng.gen_range(profile.trust_min..=profile.trust_max);
                Vehicle {
                    id: VehicleId(first_id.saturating_add(k as u32)),
                    position,
                    heading,
                    speed_kmh,
                    category: profile.category,
                    trust_score,
                    owner_label: profile.category.owner_label(),
                    status: VehicleStatus::classify(trust_score, segment.congestion),
                    segment: segment.id,
                    generated_at_ms,
                }
            })
            .collect()
    }
}
