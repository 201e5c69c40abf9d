//! Crate error types

use thiserror::Error;

/// Errors produced by the pairing, resolution and persistence layers
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt backing store: {0}")]
    Corruption(String),

    #[error("index {index} out of bounds for corpus of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("unknown corpus variant: {0}")]
    UnknownCorpus(String),

    #[error(
        "mismatch sampling exhausted after {attempts} attempts (len {len}, min gap {min_gap})"
    )]
    SamplingExhausted {
        attempts: usize,
        len: usize,
        min_gap: usize,
    },

    #[error("image codec error: {0}")]
    Image(String),

    #[error("unresolvable identifier: {0}")]
    ImageResolve(String),

    #[error("invalid tensor shape: {0}")]
    InvalidShape(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type for pairing and persistence operations
pub type Result<T> = std::result::Result<T, Error>;
