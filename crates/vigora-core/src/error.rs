//! Error type for route construction and parsing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A value violated an operation's constraint.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid coordinate {value:?}: {reason}")]
    InvalidCoordinate { value: String, reason: String },

    #[error("route plan parse error: {0}")]
    RouteParse(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
