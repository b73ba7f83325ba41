//! `ts-index` — spatial indexing and viewport queries over one snapshot.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`grid`]      | `SpatialIndex` (uniform lat/lng grid), `CellKey`          |
//! | [`rsu_index`] | `RsuIndex` (R-tree over roadside units)                   |
//! | [`viewport`]  | `ViewportQuery`, `LodConfig`, `LodTier`                   |
//! | [`error`]     | `IndexError`, `IndexResult<T>`                            |

pub mod error;
pub mod grid;
pub mod rsu_index;
pub mod viewport;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};
pub use grid::{CellKey, SpatialIndex};
pub use rsu_index::RsuIndex;
pub use viewport::{LodConfig, LodTier, ViewportQuery};
