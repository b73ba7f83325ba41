//! Population allocation across segments.
//!
//! Each segment's weight is `length_km · (1 + congestion/50)`, so a fully
//! jammed road draws three times the vehicles of an empty one of equal
//! length.  Every segment except the last receives
//! `floor(weight / Σweight · N)`; the last absorbs the remainder, which makes
//! `Σ quota == N` exact regardless of floating-point rounding.

use log::debug;

use crate::segment::{RoadSegment, TrafficDataset};
use crate::{NetworkError, NetworkResult};

/// Allocation weight of one segment.
#[inline]
pub fn allocation_weight(segment: &RoadSegment) -> f64 {
    let w = segment.length_km * (1.0 + segment.congestion / 50.0);
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// Fill `vehicle_quota` on every segment so the quotas sum to `total`.
///
/// When every weight is zero (all segments degenerate) the population is
/// split evenly instead.
///
/// # Errors
///
/// - [`NetworkError::EmptyNetwork`] if there are no segments and `total > 0`.
/// - [`NetworkError::AlreadyAllocated`] on a second call for the same dataset.
pub fn allocate_population(dataset: &mut TrafficDataset, total: usize) -> NetworkResult<()> {
    if dataset.allocated {
        return Err(NetworkError::AlreadyAllocated { total: dataset.total_vehicles });
    }
    if dataset.segments.is_empty() {
        if total > 0 {
            return Err(NetworkError::EmptyNetwork { target: total });
        }
        dataset.allocated = true;
        return Ok(());
    }

    let weights: Vec<f64> = dataset.segments.iter().map(allocation_weight).collect();
    let weight_sum: f64 = weights.iter().sum();
    let even = weight_sum <= 0.0;
    if even {
        debug!("all segment weights are zero; splitting {total} vehicles evenly");
    }

    let n = total as f64;
    let seg_count = dataset.segments.len();
    let last = seg_count - 1;
    let mut remaining = total;

    for (i, (segment, w)) in dataset.segments.iter_mut().zip(&weights).enumerate() {
        let quota = if i == last {
            remaining
        } else {
            let share = if even { 1.0 / seg_count as f64 } else { w / weight_sum };
            // min() guards the sum against an over-allocating rounding step.
            ((share * n).floor() as usize).min(remaining)
        };
        segment.vehicle_quota = quota;
        remaining -= quota;
    }

    debug_assert_eq!(remaining, 0);
    dataset.total_vehicles = total;
    dataset.allocated = true;
    Ok(())
}
