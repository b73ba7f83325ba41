//! `ts-entity` — vehicles and roadside units materialized along segments.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`category`]  | `VehicleCategory`, `CategoryProfile`, `CategoryTable`        |
//! | [`vehicle`]   | `Vehicle`, `VehicleStatus`                                   |
//! | [`generator`] | `EntityGenerator` (one vehicle per allocated quota unit)     |
//! | [`rsu`]       | `RoadsideUnit`, `RsuConfig`, `place_rsus`                    |
//! | [`error`]     | `EntityError`, `EntityResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Per-segment vehicle generation on Rayon.                  |
//! | `serde`    | Derives `Serialize` on output records, `Deserialize` on configs. |

pub mod category;
pub mod error;
pub mod generator;
pub mod rsu;
pub mod vehicle;


pub use category::{CategoryProfile, CategoryTable, VehicleCategory};
pub use error::{EntityError, EntityResult};
pub use generator::{DEFAULT_MIN_SPEED_KMH, EntityGenerator};
pub use rsu::{RoadsideUnit, RsuConfig, RsuStatus, place_rsus};
pub use vehicle::{Vehicle, VehicleStatus};
