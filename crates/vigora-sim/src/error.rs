//! Playback error type.

use thiserror::Error;
use vigora_core::CoreError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("track {0} not found")]
    TrackNotFound(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
