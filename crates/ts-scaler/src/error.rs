use thiserror::Error;

use ts_core::CoreError;
use ts_entity::EntityError;
use ts_index::IndexError;
use ts_network::NetworkError;

use crate::TelemetryError;

#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("scaler configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScalerResult<T> = Result<T, ScalerError>;
