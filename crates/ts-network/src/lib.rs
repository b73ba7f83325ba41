//! `ts-network` — road-segment synthesis and population allocation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`segment`]   | `RoadSegment`, `TrafficDataset`, `DatasetBuilder`           |
//! | [`synth`]     | `RoadNetworkSynthesizer`, `GridConfig`, `TelemetrySnapshot` |
//! | [`allocator`] | `allocate_population`, `allocation_weight`                 |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod allocator;
pub mod error;
pub mod segment;
pub mod synth;


pub use allocator::{allocate_population, allocation_weight};
pub use error::{NetworkError, NetworkResult};
pub use segment::{
    DatasetBuilder, RoadSegment, SegmentOrigin, TrafficDataset, congestion_level, current_speed,
};
pub use synth::{GridConfig, RoadNetworkSynthesizer, TelemetrySnapshot};
