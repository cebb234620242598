/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Engine configuration.
 */

//! Engine configuration.
//!
//! The url options of [`OptionsConfig`] plus the settings that only matter
//! when whole files are processed. Everything lives in one flat TOML table:
//!
//! ```toml
//! absolute = false
//! keep-query = false
//! root = "/project/public"
//! join = "default"
//! source-map = true
//! require-source-map = true
//! remove-cr = false
//! silent = false
//! ```

use std::path::Path;

use cssurl_core::OptionsConfig;
use serde::Deserialize;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    #[serde(flatten)]
    pub options: OptionsConfig,
    /// Produce a source map for the rewritten CSS.
    pub source_map: bool,
    /// Fail when the CSS has no source map.
    pub require_source_map: bool,
    /// Convert CRLF line endings to LF before processing.
    pub remove_cr: bool,
    /// Do not record warnings.
    pub silent: bool,
}

impl EngineConfig {
    /// Parse a TOML document. `origin` names it in errors.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| EngineError::ConfigParse {
            path: origin.to_string(),
            source,
        })
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&content, &display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssurl_core::JoinName;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_toml_str("", "<test>").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_flat_table_fills_both_levels() {
        let config = EngineConfig::from_toml_str(
            r#"
absolute = true
join = "search"
search-depth = 1
source-map = true
require-source-map = true
silent = true
"#,
            "<test>",
        )
        .unwrap();

        assert!(config.options.absolute);
        assert_eq!(config.options.join, JoinName::Search);
        assert_eq!(config.options.search_depth, 1);
        assert!(config.source_map);
        assert!(config.require_source_map);
        assert!(config.silent);
        assert!(!config.remove_cr);
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = EngineConfig::from_toml_str("absolute = \"yes\"", "cssurl.toml").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("cssurl.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cssurl.toml");
        std::fs::write(&path, "keep-query = true\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(config.options.keep_query);
    }
}
