//! Url rewriting for whole CSS files.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate connects the per-declaration transform of [`cssurl_core`]
//! with the source locations of [`cssurl_source_map`]. It finds the
//! declarations in a stylesheet, asks a locator where each was originally
//! written, rewrites their urls and produces the new CSS together with an
//! updated source map and any warnings.
//!
//! # Example
//!
//! ```
//! use cssurl_core::PathStyle;
//! use cssurl_engine::{CssInput, Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::default()).with_style(PathStyle::Posix);
//! let output = engine
//!     .process(CssInput::new(".a { background: url(img/a.png) }", "/site/css/main.css"))
//!     .unwrap();
//! assert_eq!(output.css, ".a { background: url(./img/a.png) }");
//! ```

pub mod config;
pub mod declarations;
pub mod error;
pub mod process;

pub use config::EngineConfig;
pub use declarations::{Declaration, scan_declarations};
pub use error::{EngineError, Result};
pub use process::{CssInput, CssOutput, Engine, Rewrite, UNMAPPED_DECLARATION, Warning};
