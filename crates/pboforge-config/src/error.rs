//! Error types for pboforge-config.

use thiserror::Error;

/// Error type for config loading and encoding.
///
/// Syntax problems are not errors at this level: the parser recovers from
/// them and reports them as [`ParseError`](crate::ParseError)s.
#[derive(Debug, Error)]
pub enum Error {
    /// Encoded config does not fit the 32-bit offsets of the format.
    #[error("encoded config too large: {size} bytes")]
    TooLarge { size: usize },

    /// A forward offset promised in pass 1 did not match the write position.
    #[error("offset drift: promised {expected}, wrote at {actual}")]
    OffsetDrift { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the common crate.
    #[error(transparent)]
    Common(#[from] pboforge_common::Error),
}

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, Error>;
