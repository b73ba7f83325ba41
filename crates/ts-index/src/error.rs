//! Index-subsystem error type.

use thiserror::Error;

/// Errors produced by `ts-index`.  All are configuration errors caught at
/// construction; queries themselves never fail.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("grid cell size {0}° is outside [{min}, {max}]", min = crate::grid::MIN_CELL_DEG, max = crate::grid::MAX_CELL_DEG)]
    CellSize(f64),

    #[error("level-of-detail configuration error: {0}")]
    Lod(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
