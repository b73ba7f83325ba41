//! Unit tests for ts-index.
//!
//! Vehicles are built directly (no generator) so a million-vehicle population
//! stays cheap to construct.

#[cfg(test)]
mod helpers {
    use std::sync::OnceLock;

    use ts_core::{BoundingBox, GeoPoint, ScalerRng, SegmentId, VehicleId};
    use ts_entity::{Vehicle, VehicleCategory, VehicleStatus};

    use crate::SpatialIndex;

    pub const CELL_DEG: f64 = 0.01;

    pub fn city() -> BoundingBox {
        BoundingBox::new(13.10, 12.85, 77.75, 77.45).unwrap()
    }

    pub fn vehicle_at(i: u32, lat: f64, lng: f64) -> Vehicle {
        Vehicle {
            id: VehicleId(i),
            position: GeoPoint::new(lat, lng),
            heading: 0.0,
            speed_kmh: 30.0,
            category: VehicleCategory::Car,
            trust_score: 80.0,
            owner_label: VehicleCategory::Car.owner_label(),
            status: VehicleStatus::Normal,
            segment: SegmentId(0),
            generated_at_ms: 0,
        }
    }

    /// `n` vehicles uniformly spread over the city.
    pub fn population(n: usize, seed: u64) -> Vec<Vehicle> {
        let b = city();
        let mut rng = ScalerRng::new(seed);
        (0..n as u32)
            .map(|i| {
                vehicle_at(i, rng.gen_range(b.south..=b.north), rng.gen_range(b.west..=b.east))
            })
            .collect()
    }

    /// One million vehicles with a 0.01° index, shared across tests.
    pub fn million() -> &'static (Vec<Vehicle>, SpatialIndex) {
        static POP: OnceLock<(Vec<Vehicle>, SpatialIndex)> = OnceLock::new();
        POP.get_or_init(|| {
            let vehicles = population(1_000_000, 42);
            let index = SpatialIndex::build(&vehicles, CELL_DEG).unwrap();
            (vehicles, index)
        })
    }
}

// ── Grid index ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use ts_core::{BoundingBox, GeoPoint};

    use super::helpers::*;
    use crate::{CellKey, SpatialIndex};

    #[test]
    fn buckets_by_floor_of_coordinate() {
        let vehicles = vec![
            vehicle_at(0, 12.901, 77.501),
            vehicle_at(1, 12.909, 77.509),
            vehicle_at(2, 12.911, 77.501),
            vehicle_at(3, -0.001, -0.001),
        ];
        let idx = SpatialIndex::build(&vehicles, 0.01).unwrap();

        assert_eq!(idx.len(), 4);
        assert_eq!(idx.cell_count(), 3);
        let k = CellKey::of(GeoPoint::new(12.905, 77.505), 0.01);
        assert_eq!(idx.cell(k), &[0, 1]);
        assert_eq!(CellKey::of(GeoPoint::new(-0.001, -0.001), 0.01), CellKey { row: -1, col: -1 });
        assert!(idx.cell(CellKey { row: 0, col: 0 }).is_empty());
    }

    #[test]
    fn keys_are_row_major() {
        let vehicles = population(5_000, 3);
        let idx = SpatialIndex::build(&vehicles, 0.05).unwrap();
        assert!(idx.keys().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn every_vehicle_indexed_once() {
        let vehicles = population(10_000, 9);
        let idx = SpatialIndex::build(&vehicles, CELL_DEG).unwrap();
        let total: usize = idx.keys().iter().map(|&k| idx.cell(k).len()).sum();
        assert_eq!(total, vehicles.len());
    }

    #[test]
    fn range_and_key_scan_agree() {
        let vehicles = population(20_000, 5);
        let idx = SpatialIndex::build(&vehicles, CELL_DEG).unwrap();

        // Small box → range enumeration.
        let small = BoundingBox::new(12.95, 12.90, 77.55, 77.50).unwrap();
        let by_range = idx.cells_intersecting(&small);
        let lo = CellKey::of(small.south_west(), CELL_DEG);
        let hi = CellKey::of(small.north_east(), CELL_DEG);
        let by_scan: Vec<CellKey> = idx
            .keys()
            .iter()
            .copied()
            .filter(|k| (lo.row..=hi.row).contains(&k.row) && (lo.col..=hi.col).contains(&k.col))
            .collect();
        assert!(!by_range.is_empty());
        assert_eq!(by_range, by_scan);

        // Huge box → key scan; returns everything.
        let world = BoundingBox::new(89.0, -89.0, 179.0, -179.0).unwrap();
        assert_eq!(idx.cells_intersecting(&world), idx.keys());
    }

    #[test]
    fn invalid_cell_size_rejected() {
        assert!(SpatialIndex::build(&[], 0.0).is_err());
        assert!(SpatialIndex::build(&[], f64::NAN).is_err());
        assert!(SpatialIndex::empty(0.01).unwrap().is_empty());
    }
}

// ── LOD configuration ─────────────────────────────────────────────────────────

#[cfg(test)]
mod lod {
    use crate::{LodConfig, LodTier};

    #[test]
    fn tier_selection() {
        let lod = LodConfig::default();
        assert_eq!(lod.tier(true, 6), LodTier::Overview);
        assert_eq!(lod.tier(true, 9), LodTier::Overview);
        assert_eq!(lod.tier(true, 10), LodTier::Cluster);
        assert_eq!(lod.tier(true, 14), LodTier::Cluster);
        assert_eq!(lod.tier(true, 15), LodTier::Full);
        assert_eq!(lod.tier(false, 18), LodTier::Overview);
    }

    #[test]
    fn cluster_cap_grows_exponentially_and_is_bounded() {
        let lod = LodConfig::default();
        assert_eq!(lod.cap(true, 10), 2_000);
        assert_eq!(lod.cap(true, 11), 4_000);
        assert_eq!(lod.cap(true, 14), 32_000);
        assert_eq!(lod.cap(true, 6), 5_000);
        assert_eq!(lod.cap(true, 20), 100_000);

        let steep = LodConfig { cluster_cap_growth: 100.0, ..LodConfig::default() };
        assert_eq!(steep.cap(true, 14), steep.full_res_cap);
    }

    #[test]
    fn samples_per_cell_grow_with_zoom() {
        let lod = LodConfig::default();
        assert_eq!(lod.samples_per_cell(10), 2);
        assert_eq!(lod.samples_per_cell(12), 8);
    }

    #[test]
    fn validation() {
        assert!(LodConfig::default().validate().is_ok());
        let inverted = LodConfig { overview_max_zoom: 16, full_res_min_zoom: 12, ..LodConfig::default() };
        assert!(inverted.validate().is_err());
        assert!(LodConfig { overview_cap: 0, ..LodConfig::default() }.validate().is_err());
        assert!(LodConfig { cluster_cap_growth: 0.5, ..LodConfig::default() }.validate().is_err());
    }
}

// ── Viewport queries ──────────────────────────────────────────────────────────

#[cfg(test)]
mod viewport {
    use std::collections::HashSet;

    use ts_core::BoundingBox;

    use super::helpers::*;
    use crate::{CellKey, LodConfig, SpatialIndex, ViewportQuery};

    #[test]
    fn overview_of_million_is_one_per_cell() {
        let (vehicles, idx) = million();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(idx, vehicles, &lod);

        let out = q.vehicles(Some(&city()), 6);
        assert!(out.len() <= lod.overview_cap);
        assert_eq!(out.len(), idx.cell_count());

        let cells: HashSet<CellKey> = out.iter().map(|v| CellKey::of(v.position, CELL_DEG)).collect();
        assert_eq!(cells.len(), out.len());
    }

    #[test]
    fn bounded_overview_picks_representatives_inside_bounds() {
        // Same 0.01° cell; only the second vehicle is inside the box.
        let vehicles = vec![vehicle_at(0, 12.9705, 77.5905), vehicle_at(1, 12.9795, 77.5995)];
        let idx = SpatialIndex::build(&vehicles, CELL_DEG).unwrap();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(&idx, &vehicles, &lod);

        let b = BoundingBox::new(12.9799, 12.9750, 77.5999, 77.5950).unwrap();
        let out = q.vehicles(Some(&b), 6);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, vehicles[1].id);

        let empty_corner = BoundingBox::new(12.9749, 12.9740, 77.5949, 77.5940).unwrap();
        assert!(q.vehicles(Some(&empty_corner), 6).is_empty());
    }

    #[test]
    fn bounded_overview_of_million_is_contained() {
        let (vehicles, idx) = million();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(idx, vehicles, &lod);

        let b = BoundingBox::new(12.9763, 12.9657, 77.5988, 77.5871).unwrap();
        let out = q.vehicles(Some(&b), 6);
        assert!(!out.is_empty());
        assert!(out.iter().all(|v| b.contains(v.position)));
    }

    /// Results borrow from the index and vehicles only, so they outlive a
    /// per-call `LodConfig`.
    fn visible<'a>(
        vehicles: &'a [ts_entity::Vehicle],
        idx: &'a SpatialIndex,
        b: &BoundingBox,
    ) -> Vec<&'a ts_entity::Vehicle> {
        let lod = LodConfig::default();
        ViewportQuery::new(idx, vehicles, &lod).vehicles(Some(b), 16)
    }

    #[test]
    fn results_outlive_lod_config() {
        let (vehicles, idx) = million();
        let b = BoundingBox::new(12.9712, 12.9650, 77.6003, 77.5901).unwrap();
        let out = visible(vehicles, idx, &b);
        assert!(!out.is_empty());
        assert!(out.iter().all(|v| b.contains(v.position)));
    }

    #[test]
    fn overview_strides_down_to_cap() {
        let (vehicles, _) = million();
        let fine = SpatialIndex::build(vehicles, 0.001).unwrap();
        assert!(fine.cell_count() > 5_000);

        let lod = LodConfig::default();
        let q = ViewportQuery::new(&fine, vehicles, &lod);
        assert_eq!(q.vehicles(None, 12).len(), lod.overview_cap);
    }

    #[test]
    fn result_size_bounded_at_every_zoom() {
        let (vehicles, idx) = million();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(idx, vehicles, &lod);
        let inner = BoundingBox::new(13.00, 12.95, 77.65, 77.55).unwrap();

        for zoom in 0..=20u8 {
            for bounds in [None, Some(city()), Some(inner)] {
                let n = q.vehicles(bounds.as_ref(), zoom).len();
                let cap = lod.cap(bounds.is_some(), zoom);
                assert!(n <= cap, "zoom {zoom}: {n} > {cap}");
            }
        }
    }

    #[test]
    fn full_resolution_is_contained_and_complete() {
        let (vehicles, idx) = million();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(idx, vehicles, &lod);

        let b = BoundingBox::new(12.9712, 12.9650, 77.6003, 77.5901).unwrap();
        let out = q.vehicles(Some(&b), 16);
        assert!(!out.is_empty());
        for v in &out {
            assert!(b.south <= v.lat() && v.lat() <= b.north);
            assert!(b.west <= v.lng() && v.lng() <= b.east);
        }

        let expected = vehicles.iter().filter(|v| b.contains(v.position)).count();
        assert!(expected < lod.full_res_cap);
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn full_resolution_respects_cap() {
        let (vehicles, idx) = million();
        let lod = LodConfig { full_res_cap: 1_000, ..LodConfig::default() };
        let q = ViewportQuery::new(idx, vehicles, &lod);
        let out = q.vehicles(Some(&city()), 18);
        assert_eq!(out.len(), 1_000);
        assert!(out.iter().all(|v| city().contains(v.position)));
    }

    #[test]
    fn cluster_samples_stay_in_bounds_and_grow_with_zoom() {
        let (vehicles, idx) = million();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(idx, vehicles, &lod);
        let b = BoundingBox::new(13.02, 12.93, 77.66, 77.53).unwrap();

        let low = q.vehicles(Some(&b), 10);
        let high = q.vehicles(Some(&b), 13);
        assert!(!low.is_empty());
        assert!(high.len() > low.len());
        assert!(low.iter().chain(&high).all(|v| b.contains(v.position)));
    }

    #[test]
    fn queries_are_deterministic() {
        let (vehicles, idx) = million();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(idx, vehicles, &lod);
        let b = BoundingBox::new(13.02, 12.93, 77.66, 77.53).unwrap();

        let ids = |zoom| q.vehicles(Some(&b), zoom).iter().map(|v| v.id).collect::<Vec<_>>();
        assert_eq!(ids(12), ids(12));
    }

    #[test]
    fn empty_index_returns_nothing() {
        let idx = SpatialIndex::empty(CELL_DEG).unwrap();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(&idx, &[], &lod);
        for zoom in [3, 12, 17] {
            assert!(q.vehicles(Some(&city()), zoom).is_empty());
        }
    }

    #[test]
    fn inverted_bounds_return_nothing() {
        let (vehicles, idx) = million();
        let lod = LodConfig::default();
        let q = ViewportQuery::new(idx, vehicles, &lod);
        let inverted = BoundingBox { north: 12.9, south: 13.0, east: 77.6, west: 77.5 };
        assert!(q.vehicles(Some(&inverted), 16).is_empty());
    }
}

// ── RSU index ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rsu_index {
    use ts_core::{BoundingBox, GeoPoint, RsuId, SegmentId};
    use ts_entity::{RoadsideUnit, RsuStatus};

    use crate::RsuIndex;

    fn rsu(i: u32, lat: f64, lng: f64) -> RoadsideUnit {
        RoadsideUnit {
            id: RsuId(i),
            position: GeoPoint::new(lat, lng),
            coverage_radius_m: 500.0,
            status: RsuStatus::Active,
            heading: 90.0,
            segment: SegmentId(0),
        }
    }

    #[test]
    fn within_is_inclusive_and_sorted() {
        let rsus = vec![rsu(0, 12.90, 77.50), rsu(1, 13.00, 77.60), rsu(2, 12.95, 77.55)];
        let idx = RsuIndex::build(&rsus);
        assert_eq!(idx.len(), 3);

        let b = BoundingBox::new(12.95, 12.90, 77.55, 77.50).unwrap();
        assert_eq!(idx.within(&b), vec![0, 2]);
    }

    #[test]
    fn nearest_unit() {
        let rsus = vec![rsu(0, 12.90, 77.50), rsu(1, 13.00, 77.60)];
        let idx = RsuIndex::build(&rsus);
        assert_eq!(idx.nearest(GeoPoint::new(12.99, 77.59)), Some(1));
        assert_eq!(RsuIndex::build(&[]).nearest(GeoPoint::new(0.0, 0.0)), None);
    }
}
