//! Source locations for generated CSS.
//!
//! This crate answers one question for the url rewriter: *which directory
//! was this declaration originally written in?* Generated CSS positions are
//! looked up in a source map whose sources have been normalized to absolute
//! paths; the directory of the original source is the base for relative
//! urls.
//!
//! # Overview
//!
//! - [`Location`] / [`LineIndex`]: positions in generated text
//! - [`AbsoluteSourceMap`]: a decoded map with absolute sources, plus the
//!   way back to source-relative form for output
//! - [`SourceLocator`]: the lookup used by the engine, implemented for
//!   source maps ([`SourceMapLocator`]) and for plain files
//!   ([`FileDirectoryLocator`])
//! - [`ColumnShifts`]: generated-column corrections after rewriting
//!
//! # Example
//!
//! ```rust
//! use cssurl_core::PathStyle;
//! use cssurl_source_map::*;
//!
//! let json = br#"{"version":3,"sources":["../src/main.scss"],"names":[],"mappings":"AAAA"}"#;
//! let map = AbsoluteSourceMap::from_slice(json, "/project/dist", PathStyle::Posix).unwrap();
//! let locator = SourceMapLocator::new(map);
//!
//! let dir = locator.original_directory(Location::new(0, 0, 0));
//! assert_eq!(dir.as_deref(), Some("/project/src"));
//! ```

pub mod codec;
pub mod error;
pub mod line_index;
pub mod locator;
pub mod shift;
pub mod types;

pub use codec::{AbsoluteSourceMap, find_reference, load_for_css, replace_reference, to_json};
pub use error::{Result, SourceMapError};
pub use line_index::LineIndex;
pub use locator::{FileDirectoryLocator, SourceLocator, SourceMapLocator};
pub use shift::{ColumnShift, ColumnShifts};
pub use types::Location;
