//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for docindex-mcp operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading a search index fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Index file not found at the expected path.
    #[error("Search index not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read search index at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is neither raw JSON nor a recognized variable assignment.
    #[error("Unrecognized search index wrapper near: {0:?}")]
    Wrapper(String),

    /// The top-level object has no `docs` array.
    #[error("Search index has no \"docs\" array")]
    MissingDocs,

    /// The JSON payload is malformed or has values of the wrong type.
    #[error("Malformed search index JSON: {0}")]
    Json(#[from] serde_json::Error),
}
