//! Core error type.
//!
//! Higher crates define their own enums and wrap `CoreError` via `From`.

use thiserror::Error;

use crate::BoundingBox;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid bounding box {0}: need finite edges with north > south and east > west")]
    InvalidBounds(BoundingBox),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ts-core`.
pub type CoreResult<T> = Result<T, CoreError>;
