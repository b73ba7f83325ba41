//! Network-subsystem error type.

use thiserror::Error;

/// Errors produced by `ts-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("grid configuration error: {0}")]
    Config(String),

    #[error("cannot allocate {target} vehicles to an empty segment list")]
    EmptyNetwork { target: usize },

    #[error("dataset already allocated ({total} vehicles)")]
    AlreadyAllocated { total: usize },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
