//! Geographic coordinate types and great-circle math.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Viewport containment is checked
//! against renderer-supplied `f64` bounds, so points must round-trip without
//! precision loss at the edges of a query box.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

/// Fold any angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_heading(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs.
    if h >= 360.0 { 0.0 } else { h }
}

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` if both coordinates are finite and inside the WGS-84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Haversine great-circle distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let d_lat = deg_to_rad(other.lat - self.lat);
        let d_lng = deg_to_rad(other.lng - self.lng);

        let lat1 = deg_to_rad(self.lat);
        let lat2 = deg_to_rad(other.lat);

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        self.distance_km(other) * 1_000.0
    }

    /// Initial bearing from `self` towards `other`, degrees clockwise from
    /// north in `[0, 360)`.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        let lat1 = deg_to_rad(self.lat);
        let lat2 = deg_to_rad(other.lat);
        let d_lng = deg_to_rad(other.lng - self.lng);

        let x = d_lng.sin() * lat2.cos();
        let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();

        normalize_heading(rad_to_deg(x.atan2(y)))
    }

    /// Linear interpolation in lat/lng space.  `t = 0` is `self`, `t = 1` is
    /// `other`.  Adequate for segments of a few kilometres.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    #[inline]
    pub fn midpoint(self, other: GeoPoint) -> GeoPoint {
        self.lerp(other, 0.5)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned lat/lng rectangle.  Boxes crossing the antimeridian are not
/// supported; `west <= east` always.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east:  f64,
    pub west:  f64,
}

impl BoundingBox {
    /// Construct and validate a box.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> crate::CoreResult<Self> {
        let b = Self { north, south, east, west };
        b.validate()?;
        Ok(b)
    }

    /// Reject non-finite, inverted, or zero-area boxes.
    pub fn validate(&self) -> crate::CoreResult<()> {
        let finite = [self.north, self.south, self.east, self.west]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.north <= self.south || self.east <= self.west {
            return Err(crate::CoreError::InvalidBounds(*self));
        }
        Ok(())
    }

    /// Inclusive containment on all four edges.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    #[inline]
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.north + self.south) * 0.5, (self.east + self.west) * 0.5)
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.south, self.west)
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.north, self.east)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[N {:.4}, S {:.4}, E {:.4}, W {:.4}]",
            self.north, self.south, self.east, self.west
        )
    }
}
