//! CLI error types.

use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Registry error.
    #[error(transparent)]
    Registry(#[from] typereg_core::Error),

    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that could not be read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Input or output JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
