//! Error types for source map handling.

use thiserror::Error;

/// Upstream failures: without a usable map the original directory of a
/// declaration cannot be determined.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The map could not be decoded
    #[error("failed to decode source map: {0}")]
    Decode(#[from] sourcemap::Error),

    /// The map decoded to a form that cannot be used for lookups
    #[error("unsupported source map format: {0}")]
    Unsupported(String),

    /// A map was required but none was supplied or referenced
    #[error("source map is required for {0} but none was found")]
    Missing(String),

    /// Reading a referenced map failed
    #[error("failed to read source map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SourceMapError>;
