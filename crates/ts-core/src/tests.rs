//! Unit tests for ts-core primitives.

#[cfg(test)]
mod ids {
    use crate::{SegmentId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = VehicleId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(VehicleId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn display_uses_prefix() {
        assert_eq!(VehicleId(7).to_string(), "VEH-000007");
        assert_eq!(SegmentId(123_456).to_string(), "SEG-123456");
    }
}

#[cfg(test)]
mod geo {
    use crate::{BoundingBox, GeoPoint, deg_to_rad, normalize_heading, rad_to_deg};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(12.9716, 77.5946);
        assert!(p.distance_km(p) < 1e-9);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111.2 km
        let a = GeoPoint::new(12.0, 77.0);
        let b = GeoPoint::new(13.0, 77.0);
        let d = a.distance_km(b);
        assert!((d - 111.195).abs() < 0.1, "got {d}");
        assert!((a.distance_m(b) - d * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let o = GeoPoint::new(0.0, 0.0);
        assert!(o.bearing_deg(GeoPoint::new(1.0, 0.0)).abs() < 1e-9);
        assert!((o.bearing_deg(GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((o.bearing_deg(GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((o.bearing_deg(GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn heading_normalization() {
        assert_eq!(normalize_heading(370.0), 10.0);
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        let h = normalize_heading(-1e-20);
        assert!((0.0..360.0).contains(&h));
    }

    #[test]
    fn degree_radian_conversion() {
        assert!((deg_to_rad(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((rad_to_deg(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn validity() {
        assert!(GeoPoint::new(12.9, 77.6).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 77.6).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(12.0, 24.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.midpoint(b), GeoPoint::new(11.0, 22.0));
    }

    #[test]
    fn bbox_inclusive_containment() {
        let b = BoundingBox::new(13.0, 12.0, 78.0, 77.0).unwrap();
        assert!(b.contains(GeoPoint::new(12.5, 77.5)));
        assert!(b.contains(GeoPoint::new(13.0, 78.0)));
        assert!(b.contains(GeoPoint::new(12.0, 77.0)));
        assert!(!b.contains(GeoPoint::new(13.0001, 77.5)));
        assert_eq!(b.center(), GeoPoint::new(12.5, 77.5));
    }

    #[test]
    fn bbox_rejects_inverted_or_nan() {
        assert!(BoundingBox::new(12.0, 13.0, 78.0, 77.0).is_err());
        assert!(BoundingBox::new(13.0, 12.0, 77.0, 78.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 12.0, 78.0, 77.0).is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{ScalerRng, SegmentId, SegmentRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SegmentRng::new(12345, SegmentId(0));
        let mut r2 = SegmentRng::new(12345, SegmentId(0));
        for _ in 0..100 {
            assert_eq!(r1.unit(), r2.unit());
        }
    }

    #[test]
    fn different_segments_differ() {
        let mut r0 = SegmentRng::new(1, SegmentId(0));
        let mut r1 = SegmentRng::new(1, SegmentId(1));
        assert_ne!(r0.unit(), r1.unit());
    }

    #[test]
    fn unit_in_bounds() {
        let mut rng = SegmentRng::new(0, SegmentId(0));
        for _ in 0..1000 {
            let v = rng.unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn epoch_seeds_differ() {
        assert_ne!(ScalerRng::epoch_seed(42, 0), ScalerRng::epoch_seed(42, 1));
        assert_eq!(ScalerRng::epoch_seed(42, 3), ScalerRng::epoch_seed(42, 3));
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = ScalerRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn child_streams_are_reproducible() {
        let mut a = ScalerRng::new(7);
        let mut b = ScalerRng::new(7);
        let (mut ca, mut cb) = (a.child(1), b.child(1));
        for _ in 0..50 {
            assert_eq!(ca.gen_range(0..1000u32), cb.gen_range(0..1000u32));
        }
        let mut other = ScalerRng::new(7).child(2);
        let mut same = ScalerRng::new(7).child(1);
        let xs: Vec<u32> = (0..8).map(|_| other.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..8).map(|_| same.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }
}
