//! Source-located `url()` resolution for CSS.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! After Sass/Less compilation and concatenation, a `url(...)` in the output
//! CSS no longer sits next to the file that authored it. This crate rewrites
//! one declaration value at a time, resolving each url against the directory
//! of its *original* source file (supplied by the caller, usually from a
//! source map) and re-encoding the result either as an absolute path or as a
//! request relative to the file being processed.
//!
//! This crate provides:
//! - A tokenizer splitting declaration values into literal and url segments
//! - A classifier deciding how a url is addressed (relative, root, module...)
//! - A pluggable [`Join`] strategy turning `(base, uri)` into a path
//! - [`Session`], the per-file transform with eagerly validated [`Options`]
//!
//! # Example
//!
//! ```
//! use cssurl_core::{LoaderContext, Options, PathStyle, Session};
//!
//! let options = Options::new().with_style(PathStyle::Posix).with_absolute(true);
//! let session = Session::new(options, LoaderContext::native("/project/dist")).unwrap();
//!
//! let value = session.transform_value("url('../images/img.jpg')", "/project/src/feature");
//! assert_eq!(value, "url('/project/src/images/img.jpg')");
//! ```

mod classify;
mod diagnostics;
mod error;
mod join;
mod options;
mod path_style;
mod probe;
mod tokenizer;
mod transform;

pub use classify::{Classifier, UrlKind, is_url_request};
pub use diagnostics::{DiagnosticSink, MemorySink, NullSink, TracingSink};
pub use error::ConfigError;
pub use join::{
    DefaultJoin, DefaultJoinFactory, Join, JoinContext, JoinFactory, SearchJoin, SearchJoinFactory,
};
pub use options::{DEFAULT_SEARCH_DEPTH, JoinName, Options, OptionsConfig};
pub use path_style::PathStyle;
pub use probe::{MemoryProbe, NativeProbe, PathKind, PathProbe};
pub use tokenizer::{Quote, Segment, UrlToken, join_segments, split_value};
pub use transform::{LoaderContext, Session, split_query, url_to_request};

/// Result type for operations that can fail on configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
