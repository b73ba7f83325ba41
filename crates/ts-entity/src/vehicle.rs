//! Generated vehicle records.

use ts_core::{GeoPoint, SegmentId, VehicleId};

use crate::VehicleCategory;

/// Trust scores below this mark a vehicle as `Warning`.
pub const WARNING_TRUST: f64 = 60.0;

/// Segment congestion above this marks a vehicle as `Alert`.
pub const ALERT_CONGESTION: f64 = 80.0;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleStatus {
    #[default]
    Normal,
    Warning,
    Alert,
}

impl VehicleStatus {
    /// Low trust wins over congestion: `Warning` if trust < 60, else `Alert`
    /// if the segment is more than 80 % congested, else `Normal`.
    pub fn classify(trust_score: f64, segment_congestion: f64) -> Self {
        if trust_score < WARNING_TRUST {
            VehicleStatus::Warning
        } else if segment_congestion > ALERT_CONGESTION {
            VehicleStatus::Alert
        } else {
            VehicleStatus::Normal
        }
    }
}

/// One simulated vehicle.  Immutable for the lifetime of its refresh cycle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Vehicle {
    pub id: VehicleId,
    pub position: GeoPoint,
    /// Degrees clockwise from north, `[0, 360)`.
    pub heading: f64,
    pub speed_kmh: f64,
    pub category: VehicleCategory,
    /// `[0, 100]`
    pub trust_score: f64,
    pub owner_label: &'static str,
    pub status: VehicleStatus,
    /// Segment the vehicle was placed on.
    pub segment: SegmentId,
    /// Unix milliseconds of the refresh that produced this vehicle.
    pub generated_at_ms: u64,
}

impl Vehicle {
    #[inline]
    pub fn lat(&self) -> f64 {
        self.position.lat
    }

    #[inline]
    pub fn lng(&self) -> f64 {
        self.position.lng
    }
}
