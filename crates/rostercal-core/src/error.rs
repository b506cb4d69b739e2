//! Error types for rostercal-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("invalid cell range: {0}")]
    InvalidRange(String),

    /// Reference past the last row or column of a sheet
    #[error("cell reference out of bounds: {0}")]
    OutOfBounds(String),
}
