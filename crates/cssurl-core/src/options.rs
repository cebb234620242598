/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Session options and their serialized configuration form.
 */

//! Options.
//!
//! [`OptionsConfig`] is the serialized form (config files, command line).
//! [`Options`] is what a [`Session`](crate::Session) runs with. Options are
//! checked once, when the session is created, and are immutable afterwards.
//!
//! # Configuration Format
//!
//! ```toml
//! absolute = false
//! keep-query = true
//! root = "/project/public"
//! join = "search"
//! search-depth = 3
//! debug = false
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::join::{DefaultJoinFactory, JoinFactory, SearchJoinFactory};
use crate::path_style::PathStyle;

/// Number of ancestor directories the search join tries by default.
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

/// Built-in join strategies selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinName {
    #[default]
    Default,
    Search,
}

/// Serialized options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OptionsConfig {
    /// Emit absolute paths instead of context-relative requests.
    pub absolute: bool,
    /// Keep the `?query` / `#hash` suffix of rewritten urls.
    pub keep_query: bool,
    /// Base directory for root-relative urls; unset leaves them alone.
    pub root: Option<String>,
    /// Join strategy.
    pub join: JoinName,
    /// Ancestors tried by the search join.
    pub search_depth: usize,
    /// Emit one diagnostic line per resolved url.
    pub debug: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            absolute: false,
            keep_query: false,
            root: None,
            join: JoinName::Default,
            search_depth: DEFAULT_SEARCH_DEPTH,
            debug: false,
        }
    }
}

impl OptionsConfig {
    /// Convert to session options using the given path style.
    ///
    /// Nothing is validated here; see [`Session::new`](crate::Session::new).
    pub fn to_options(&self, style: PathStyle) -> Options {
        let join: Arc<dyn JoinFactory> = match self.join {
            JoinName::Default => Arc::new(DefaultJoinFactory),
            JoinName::Search => Arc::new(SearchJoinFactory::new(self.search_depth)),
        };

        Options {
            absolute: self.absolute,
            keep_query: self.keep_query,
            root: self.root.clone(),
            style,
            join,
        }
    }
}

/// Options for one session.
#[derive(Clone)]
pub struct Options {
    absolute: bool,
    keep_query: bool,
    root: Option<String>,
    style: PathStyle,
    join: Arc<dyn JoinFactory>,
}

impl Options {
    /// Defaults: context-relative output, query dropped, no root, default
    /// join, host path style.
    pub fn new() -> Self {
        Self {
            absolute: false,
            keep_query: false,
            root: None,
            style: PathStyle::native(),
            join: Arc::new(DefaultJoinFactory),
        }
    }

    pub fn with_absolute(mut self, absolute: bool) -> Self {
        self.absolute = absolute;
        self
    }

    pub fn with_keep_query(mut self, keep_query: bool) -> Self {
        self.keep_query = keep_query;
        self
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_join(mut self, join: Arc<dyn JoinFactory>) -> Self {
        self.join = join;
        self
    }

    pub fn absolute(&self) -> bool {
        self.absolute
    }

    pub fn keep_query(&self) -> bool {
        self.keep_query
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    pub fn join_factory(&self) -> &Arc<dyn JoinFactory> {
        &self.join
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("absolute", &self.absolute)
            .field("keep_query", &self.keep_query)
            .field("root", &self.root)
            .field("style", &self.style)
            .field("join", &self.join.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: OptionsConfig = toml::from_str("").unwrap();
        assert_eq!(config, OptionsConfig::default());
        assert_eq!(config.search_depth, DEFAULT_SEARCH_DEPTH);
    }

    #[test]
    fn test_config_kebab_case_keys() {
        let config: OptionsConfig = toml::from_str(
            r#"
absolute = true
keep-query = true
root = "/project"
join = "search"
search-depth = 5
"#,
        )
        .unwrap();
        assert!(config.absolute);
        assert!(config.keep_query);
        assert_eq!(config.root.as_deref(), Some("/project"));
        assert_eq!(config.join, JoinName::Search);
        assert_eq!(config.search_depth, 5);
    }

    #[test]
    fn test_unknown_join_name_is_rejected() {
        let result: Result<OptionsConfig, _> = toml::from_str(r#"join = "magic""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_options_selects_join() {
        let config = OptionsConfig {
            join: JoinName::Search,
            ..Default::default()
        };
        let options = config.to_options(PathStyle::Posix);
        assert_eq!(options.join_factory().name(), "search");
        assert_eq!(options.style(), PathStyle::Posix);
    }
}
