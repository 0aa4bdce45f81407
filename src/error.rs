//! Error types for the point index.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BkdError>;

#[derive(Debug, Error)]
pub enum BkdError {
    /// Coordinate is NaN, infinite, or outside the geographic domain.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Point store is sealed; no further points can be appended")]
    Sealed,

    #[error("Index is still building; seal it before querying")]
    NotReady,

    /// A node could not be split on either dimension. The builder logs this
    /// and emits an oversized block instead of returning it.
    #[error("Cannot split {count} identical points below leaf size {leaf_size}")]
    BuildInvariant { count: usize, leaf_size: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid snapshot format")]
    InvalidFormat,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(feature = "snapshot")]
impl From<bincode::Error> for BkdError {
    fn from(e: bincode::Error) -> Self {
        BkdError::Serialization(e.to_string())
    }
}
