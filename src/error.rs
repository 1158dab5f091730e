use std::io;

use thiserror::Error;

/// Unified error type for the filter family.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error from the underlying reader or writer.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Parameters that would make index computation impossible.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The stream ended before the bytes its header implies.
    #[error("truncated {section}: expected {expected} bytes, found {found}")]
    Truncated {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    /// Two filters with different (num_hashes, num_bits) were combined.
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
