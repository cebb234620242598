//! Error types for the engine.
//!
//! Copyright (c) 2025 Posit, PBC

use cssurl_core::ConfigError;
use cssurl_source_map::SourceMapError;
use thiserror::Error;

/// Failures that stop a file from being processed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Options could not be turned into a session
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The source map was unusable or missing
    #[error(transparent)]
    SourceMap(#[from] SourceMapError),

    /// A configuration file could not be parsed
    #[error("invalid configuration in {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Reading an input failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Whether the error is a configuration problem rather than a problem
    /// with the input.
    pub fn is_config(&self) -> bool {
        matches!(self, EngineError::Config(_) | EngineError::ConfigParse { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
