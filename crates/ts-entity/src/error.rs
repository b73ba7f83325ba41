use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("entity configuration error: {0}")]
    Config(String),
}

pub type EntityResult<T> = Result<T, EntityError>;
