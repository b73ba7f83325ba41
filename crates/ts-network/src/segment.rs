//! Road segments, the per-refresh dataset, and its builder.
//!
//! # Lifecycle
//!
//! ```text
//! DatasetBuilder::add_segment ... build()   → TrafficDataset (quota = 0)
//! allocate_population(&mut dataset, N)      → quotas filled, Σ quota = N
//! ```
//!
//! After allocation the dataset is treated as immutable for the rest of the
//! refresh cycle.

use ts_core::{GeoPoint, SegmentId};

/// Where a dataset's segments came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentOrigin {
    /// Built from consecutive telemetry sample pairs.
    Telemetry,
    /// Uniform grid over the target region (telemetry missing or too sparse).
    SyntheticGrid,
}

// ── RoadSegment ───────────────────────────────────────────────────────────────

/// A directed road segment between two points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    pub id: SegmentId,
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Haversine length of `start → end`.
    pub length_km: f64,
    /// 0 (free-flowing) to 100 (standstill).
    pub congestion: f64,
    /// km/h with no congestion.
    pub free_flow_speed: f64,
    /// km/h; always `free_flow_speed · (1 − congestion/100)`, never negative.
    pub current_speed: f64,
    /// Vehicles assigned by the allocator.  Zero until allocation.
    pub vehicle_quota: usize,
}

impl RoadSegment {
    /// Build a segment, clamping congestion into `[0, 100]` and deriving
    /// length and current speed.
    pub fn new(
        id: SegmentId,
        start: GeoPoint,
        end: GeoPoint,
        congestion: f64,
        free_flow_speed: f64,
    ) -> Self {
        let congestion = if congestion.is_finite() { congestion.clamp(0.0, 100.0) } else { 0.0 };
        let free_flow_speed = free_flow_speed.max(0.0);
        Self {
            id,
            start,
            end,
            length_km: start.distance_km(end),
            congestion,
            free_flow_speed,
            current_speed: current_speed(free_flow_speed, congestion),
            vehicle_quota: 0,
        }
    }

    #[inline]
    pub fn bearing_deg(&self) -> f64 {
        self.start.bearing_deg(self.end)
    }

    /// Point at fraction `t ∈ [0, 1]` along the segment.
    #[inline]
    pub fn point_at(&self, t: f64) -> GeoPoint {
        self.start.lerp(self.end, t)
    }

    #[inline]
    pub fn midpoint(&self) -> GeoPoint {
        self.start.midpoint(self.end)
    }

    /// `true` if free-flow speed is strictly above `threshold_kmh`.
    #[inline]
    pub fn is_major(&self, threshold_kmh: f64) -> bool {
        self.free_flow_speed > threshold_kmh
    }
}

/// `free_flow · (1 − congestion/100)`, clamped non-negative.
#[inline]
pub fn current_speed(free_flow_speed: f64, congestion: f64) -> f64 {
    (free_flow_speed * (1.0 - congestion / 100.0)).max(0.0)
}

/// `100 · (1 − current/free_flow)`, clamped to `[0, 100]`.
///
/// Returns `None` when the pair cannot describe a road (non-positive free
/// flow, negative or non-finite current speed).
pub fn congestion_level(free_flow_speed: f64, current_speed: f64) -> Option<f64> {
    if !free_flow_speed.is_finite() || free_flow_speed <= 0.0 {
        return None;
    }
    if !current_speed.is_finite() || current_speed < 0.0 {
        return None;
    }
    Some((100.0 * (1.0 - current_speed / free_flow_speed)).clamp(0.0, 100.0))
}

// ── TrafficDataset ────────────────────────────────────────────────────────────

/// Segments produced by one synthesis pass, plus totals.
///
/// Construct via [`DatasetBuilder`]; fill quotas with
/// [`allocate_population`](crate::allocate_population).
#[derive(Clone, Debug)]
pub struct TrafficDataset {
    pub segments: Vec<RoadSegment>,
    pub total_length_km: f64,
    /// Σ `vehicle_quota`; zero until allocated.
    pub total_vehicles: usize,
    pub origin: SegmentOrigin,
    pub(crate) allocated: bool,
}

impl TrafficDataset {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Segments faster than `threshold_kmh`, longest first.
    pub fn major_segments(&self, threshold_kmh: f64) -> Vec<&RoadSegment> {
        let mut major: Vec<&RoadSegment> = self
            .segments
            .iter()
            .filter(|s| s.is_major(threshold_kmh))
            .collect();
        major.sort_by(|a, b| b.length_km.total_cmp(&a.length_km).then(a.id.cmp(&b.id)));
        major
    }
}

// ── DatasetBuilder ────────────────────────────────────────────────────────────

/// Accumulate segments, then call [`build`](Self::build).
///
/// Ids are assigned sequentially from 0 in insertion order.
///
/// # Example
///
/// ```
/// use ts_core::GeoPoint;
/// use ts_network::{DatasetBuilder, SegmentOrigin};
///
/// let mut b = DatasetBuilder::new();
/// b.add_segment(GeoPoint::new(12.97, 77.59), GeoPoint::new(12.98, 77.59), 50.0, 60.0);
/// let ds = b.build(SegmentOrigin::Telemetry);
/// assert_eq!(ds.segment_count(), 1);
/// assert_eq!(ds.segments[0].current_speed, 30.0);
/// ```
pub struct DatasetBuilder {
    segments: Vec<RoadSegment>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn with_capacity(segments: usize) -> Self {
        Self { segments: Vec::with_capacity(segments) }
    }

    /// Add a directed segment and return its id.
    pub fn add_segment(
        &mut self,
        start: GeoPoint,
        end: GeoPoint,
        congestion: f64,
        free_flow_speed: f64,
    ) -> SegmentId {
        let id = SegmentId(self.segments.len() as u32);
        self.segments.push(RoadSegment::new(id, start, end, congestion, free_flow_speed));
        id
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Consume the builder and produce an unallocated [`TrafficDataset`].
    pub fn build(self, origin: SegmentOrigin) -> TrafficDataset {
        let total_length_km = self.segments.iter().map(|s| s.length_km).sum();
        TrafficDataset {
            segments: self.segments,
            total_length_km,
            total_vehicles: 0,
            origin,
            allocated: false,
        }
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
