//! Error types for PBO packing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or packing a PBO.
#[derive(Debug, Error)]
pub enum PackError {
    /// The output directory or file could not be created.
    #[error("access to {} denied: {source}", path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No prefix was given and none could be derived.
    #[error("no prefix found for {}", directory.display())]
    MissingPrefix { directory: PathBuf },

    /// A file's content does not match the size recorded in its header.
    #[error("size mismatch for '{path}': header records {expected} bytes, content has {actual}")]
    SizeMismatch { path: String, expected: u64, actual: u64 },

    /// A packer component failed.
    #[error("component {name} failed: {message}")]
    Component { name: String, message: String },

    /// Config loading or encoding error.
    #[error("config error: {0}")]
    Config(#[from] pboforge_config::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackError {
    /// Build a [`PackError::Component`] for the named component.
    pub fn component(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type for PBO operations.
pub type Result<T> = std::result::Result<T, PackError>;
