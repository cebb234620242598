//! Original-directory lookup for generated positions

use cssurl_core::PathStyle;

use crate::codec::AbsoluteSourceMap;
use crate::types::Location;

/// Answers where the text at a generated position was originally written.
pub trait SourceLocator: Send + Sync {
    /// Absolute directory of the original source for `location`, or None
    /// when the position is not covered.
    fn original_directory(&self, location: Location) -> Option<String>;

    /// The map backing this locator, if there is one.
    fn source_map(&self) -> Option<&AbsoluteSourceMap> {
        None
    }
}

/// Locates positions through a source map.
#[derive(Debug, Clone)]
pub struct SourceMapLocator {
    map: AbsoluteSourceMap,
}

impl SourceMapLocator {
    pub fn new(map: AbsoluteSourceMap) -> Self {
        Self { map }
    }
}

impl SourceLocator for SourceMapLocator {
    fn original_directory(&self, location: Location) -> Option<String> {
        let source = self.map.lookup_source(location)?;
        Some(self.map.style().dirname(source))
    }

    fn source_map(&self) -> Option<&AbsoluteSourceMap> {
        Some(&self.map)
    }
}

/// Every position belongs to the directory of the CSS file itself.
///
/// Used for hand-written CSS that has no map.
#[derive(Debug, Clone)]
pub struct FileDirectoryLocator {
    directory: String,
}

impl FileDirectoryLocator {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Locator for the directory containing `css_path`.
    pub fn for_file(css_path: &str, style: PathStyle) -> Self {
        Self::new(style.dirname(css_path))
    }
}

impl SourceLocator for FileDirectoryLocator {
    fn original_directory(&self, _location: Location) -> Option<String> {
        Some(self.directory.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_locator_returns_source_directory() {
        let json = br#"{"version":3,"sources":["../scss/a/_a.scss","../scss/b.scss"],"names":[],"mappings":"AAAA;ACAA"}"#;
        let map = AbsoluteSourceMap::from_slice(json, "/p/css", PathStyle::Posix).unwrap();
        let locator = SourceMapLocator::new(map);

        assert_eq!(
            locator.original_directory(Location::new(0, 0, 0)).as_deref(),
            Some("/p/scss/a")
        );
        assert_eq!(
            locator.original_directory(Location::new(10, 1, 3)).as_deref(),
            Some("/p/scss")
        );
        assert!(locator.source_map().is_some());
    }

    #[test]
    fn test_file_directory_locator() {
        let locator = FileDirectoryLocator::for_file("/site/css/main.css", PathStyle::Posix);
        assert_eq!(
            locator.original_directory(Location::new(99, 7, 3)).as_deref(),
            Some("/site/css")
        );
        assert!(locator.source_map().is_none());
    }
}
