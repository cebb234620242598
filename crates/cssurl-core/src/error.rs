//! Error types for session configuration.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Configuration errors. These are reported when a session is created,
/// before any declaration is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The root must be an absolute path
    #[error("root must be an absolute path, got \"{0}\"")]
    RootNotAbsolute(String),

    /// The root must name an existing directory
    #[error("root \"{0}\" is not an existing directory")]
    RootNotDirectory(String),

    /// The root could not be probed at all
    #[error("failed to check root \"{root}\": {source}")]
    RootProbe {
        root: String,
        #[source]
        source: std::io::Error,
    },

    /// A join factory refused to build a join for this session
    #[error("join \"{name}\" cannot be used: {reason}")]
    JoinRejected { name: String, reason: String },
}
