//! `ts-core` — foundational types for the traffic scaler.
//!
//! This crate is a dependency of every other `ts-*` crate.  It has no `ts-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`geo`]     | `GeoPoint`, `BoundingBox`, haversine, bearing, deg/rad    |
//! | [`ids`]     | `SegmentId`, `VehicleId`, `RsuId`, `ZoneId`               |
//! | [`rng`]     | `SegmentRng` (per-segment), `ScalerRng` (per-refresh)     |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, GeoPoint, deg_to_rad, normalize_heading, rad_to_deg};
pub use ids::{RsuId, SegmentId, VehicleId, ZoneId};
pub use rng::{ScalerRng, SegmentRng};
