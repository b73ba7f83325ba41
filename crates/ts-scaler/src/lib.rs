//! `ts-scaler` — the traffic scaler service.
//!
//! Turns sparse provider telemetry into a large, deterministic synthetic
//! vehicle population and serves level-of-detail viewport queries over it.
//!
//! # Refresh pipeline
//!
//! ```text
//! fetch (async) → synthesize segments → allocate N → generate vehicles
//!               → place RSUs → build indexes → derive congestion zones
//!               → publish snapshot (Arc swap)
//! ```
//!
//! Each refresh is cached for `cache_duration_ms`.  A failed fetch never
//! reaches the caller: the previous snapshot keeps serving, or the first
//! snapshot is built from the synthetic grid.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`scaler`]    | `TrafficScaler`, `RefreshOutcome`, `CacheState`, `ScalerStats` |
//! | [`builder`]   | `ScalerBuilder`                                            |
//! | [`config`]    | `ScalerConfig` (JSON-loadable)                             |
//! | [`telemetry`] | `TelemetrySource`, `StaticTelemetry`, `CsvTelemetry`       |
//! | [`congestion`]| `CongestionZone`, `Severity`, `CongestionConfig`           |
//! | [`snapshot`]  | `Snapshot`, `DataOrigin`                                   |
//! | [`error`]     | `ScalerError`, `ScalerResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Vehicle generation on Rayon; output is unchanged.         |

pub mod builder;
pub mod config;
pub mod congestion;
pub mod error;
pub mod scaler;
pub mod snapshot;
pub mod telemetry;


pub use builder::ScalerBuilder;
pub use config::{DEFAULT_REGION, ScalerConfig};
pub use congestion::{
    CongestionConfig, CongestionZone, Severity, ZoneSource, derive_zones, zones_from_rows,
    zones_from_segments,
};
pub use error::{ScalerError, ScalerResult};
pub use scaler::{CacheState, RefreshOutcome, ScalerStats, TrafficScaler};
pub use snapshot::{DataOrigin, Snapshot};
pub use telemetry::{
    CongestionRow, CsvTelemetry, StaticTelemetry, TelemetryError, TelemetryFeed, TelemetryResult,
    TelemetrySource, load_feed_reader,
};
