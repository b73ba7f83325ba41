//! Uniform lat/lng grid over generated vehicles.
//!
//! # Layout
//!
//! ```text
//! key(v)  = (floor(lat / cell_deg), floor(lng / cell_deg))
//! cells   : FxHashMap<CellKey, Vec<u32>>     // indices into the vehicle slice
//! keys    : Vec<CellKey>                     // populated keys, row-major sorted
//! ```
//!
//! Cells hold indices rather than vehicles so the index and the vehicle list
//! it was built from must be kept together; the scaler snapshot owns both.
//! The index is rebuilt wholesale each refresh and never mutated afterwards.

use rustc_hash::FxHashMap;

use ts_core::{BoundingBox, GeoPoint};
use ts_entity::Vehicle;

use crate::{IndexError, IndexResult};

/// Smallest accepted cell edge; keeps `lat / cell_deg` inside `i32`.
pub const MIN_CELL_DEG: f64 = 1e-6;
pub const MAX_CELL_DEG: f64 = 180.0;

// ── CellKey ───────────────────────────────────────────────────────────────────

/// Grid cell coordinate.  Ordering is row-major (south → north, west → east).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CellKey {
    pub row: i32,
    pub col: i32,
}

impl CellKey {
    #[inline]
    pub fn of(p: GeoPoint, cell_deg: f64) -> Self {
        Self {
            row: (p.lat / cell_deg).floor() as i32,
            col: (p.lng / cell_deg).floor() as i32,
        }
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

pub struct SpatialIndex {
    cell_deg: f64,
    cells: FxHashMap<CellKey, Vec<u32>>,
    keys: Vec<CellKey>,
    len: usize,
}

impl SpatialIndex {
    /// Bucket every vehicle by cell.
    ///
    /// Time complexity: O(V) for bucketing + O(C log C) to sort the C
    /// populated keys.
    pub fn build(vehicles: &[Vehicle], cell_deg: f64) -> IndexResult<Self> {
        validate_cell_deg(cell_deg)?;

        let mut cells: FxHashMap<CellKey, Vec<u32>> = FxHashMap::default();
        for (i, v) in vehicles.iter().enumerate() {
            cells.entry(CellKey::of(v.position, cell_deg)).or_default().push(i as u32);
        }

        let mut keys: Vec<CellKey> = cells.keys().copied().collect();
        keys.sort_unstable();

        Ok(Self { cell_deg, cells, keys, len: vehicles.len() })
    }

    /// An index over nothing.
    pub fn empty(cell_deg: f64) -> IndexResult<Self> {
        Self::build(&[], cell_deg)
    }

    pub fn cell_deg(&self) -> f64 {
        self.cell_deg
    }

    /// Number of populated cells.
    pub fn cell_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of indexed vehicles.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Populated keys, row-major.
    pub fn keys(&self) -> &[CellKey] {
        &self.keys
    }

    /// Vehicle indices in `key`; empty for unpopulated cells.
    pub fn cell(&self, key: CellKey) -> &[u32] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Populated cells overlapping `bounds`, row-major.
    ///
    /// Enumerates whichever is smaller: the cell range covered by `bounds`, or
    /// the populated keys.  A continent-sized box over a city-sized dataset
    /// therefore costs O(populated cells), not O(box area).
    pub fn cells_intersecting(&self, bounds: &BoundingBox) -> Vec<CellKey> {
        if bounds.validate().is_err() {
            return Vec::new();
        }
        let lo = CellKey::of(bounds.south_west(), self.cell_deg);
        let hi = CellKey::of(bounds.north_east(), self.cell_deg);

        let rows = (hi.row as i64 - lo.row as i64 + 1) as u64;
        let cols = (hi.col as i64 - lo.col as i64 + 1) as u64;

        if rows.saturating_mul(cols) <= self.keys.len() as u64 {
            let mut out = Vec::new();
            for row in lo.row..=hi.row {
                for col in lo.col..=hi.col {
                    let key = CellKey { row, col };
                    if self.cells.contains_key(&key) {
                        out.push(key);
                    }
                }
            }
            out
        } else {
            self.keys
                .iter()
                .copied()
                .filter(|k| (lo.row..=hi.row).contains(&k.row) && (lo.col..=hi.col).contains(&k.col))
                .collect()
        }
    }
}

fn validate_cell_deg(cell_deg: f64) -> IndexResult<()> {
    if !(MIN_CELL_DEG..=MAX_CELL_DEG).contains(&cell_deg) {
        return Err(IndexError::CellSize(cell_deg));
    }
    Ok(())
}
