//! Source map decoding and encoding
//!
//! Maps are decoded with the `sourcemap` crate and immediately normalized so
//! every source is an absolute path. That is the only form the locator
//! looks at. On the way out the sources are made relative to the directory
//! the map is written to, and generated columns are corrected for any text
//! that was rewritten.

use std::path::Path;

use cssurl_core::PathStyle;
use once_cell::sync::Lazy;
use regex::Regex;
use sourcemap::{DecodedMap, SourceMap, SourceMapBuilder};

use crate::error::{Result, SourceMapError};
use crate::shift::ColumnShifts;
use crate::types::Location;

/// A `/*# sourceMappingURL=... */` comment in CSS.
static CSS_MAP_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\*\s*[#@]\s*sourceMappingURL\s*=\s*([^\s*]+)\s*\*/").unwrap()
});

/// A decoded source map whose sources are all absolute paths.
#[derive(Debug, Clone)]
pub struct AbsoluteSourceMap {
    map: SourceMap,
    style: PathStyle,
}

impl AbsoluteSourceMap {
    /// Normalize every source of `map` to an absolute path.
    ///
    /// Relative sources are resolved against `map_dir`, the directory the
    /// map was read from. A `file://` prefix is dropped.
    pub fn normalize(mut map: SourceMap, map_dir: &str, style: PathStyle) -> Self {
        for idx in 0..map.get_source_count() {
            let Some(source) = map.get_source(idx) else {
                continue;
            };
            let absolute = absolute_source(source, map_dir, style);
            map.set_source(idx, &absolute);
        }
        Self { map, style }
    }

    /// Decode JSON bytes and normalize against `map_dir`.
    pub fn from_slice(bytes: &[u8], map_dir: &str, style: PathStyle) -> Result<Self> {
        let map = regular_map(sourcemap::decode_slice(bytes)?)?;
        Ok(Self::normalize(map, map_dir, style))
    }

    /// Decode a `data:application/json;base64,...` url.
    pub fn from_data_url(url: &str, map_dir: &str, style: PathStyle) -> Result<Self> {
        let map = regular_map(sourcemap::decode_data_url(url)?)?;
        Ok(Self::normalize(map, map_dir, style))
    }

    /// Read and decode a map file; sources resolve against its directory.
    pub fn from_file(path: &str, style: PathStyle) -> Result<Self> {
        let bytes = std::fs::read(Path::new(path)).map_err(|source| SourceMapError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_slice(&bytes, &style.dirname(path), style)
    }

    /// Absolute path of the source that produced the generated position,
    /// using the nearest preceding mapping.
    pub fn lookup_source(&self, location: Location) -> Option<&str> {
        let row = u32::try_from(location.row).ok()?;
        let column = u32::try_from(location.column).ok()?;
        self.map.lookup_token(row, column)?.get_source()
    }

    /// Absolute sources, in map order.
    pub fn sources(&self) -> Vec<&str> {
        (0..self.map.get_source_count())
            .filter_map(|idx| self.map.get_source(idx))
            .collect()
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// The map with its sources made relative to `out_dir`.
    pub fn to_relative(&self, out_dir: &str) -> SourceMap {
        let mut map = self.map.clone();
        for idx in 0..map.get_source_count() {
            let Some(source) = map.get_source(idx) else {
                continue;
            };
            let relative = self.relative_source(out_dir, source);
            map.set_source(idx, &relative);
        }
        map
    }

    /// Rebuild the map for rewritten CSS: generated columns are corrected
    /// by `shifts` and sources made relative to `out_dir`.
    ///
    /// Tokens without a source carry no position information and are
    /// dropped.
    pub fn rebuild(&self, shifts: &ColumnShifts, out_dir: &str, file: Option<&str>) -> SourceMap {
        if shifts.is_empty() {
            let mut map = self.to_relative(out_dir);
            if let Some(file) = file {
                map.set_file(Some(file));
            }
            return map;
        }

        let mut builder = SourceMapBuilder::new(file);
        for token in self.map.tokens() {
            let Some(source) = token.get_source() else {
                continue;
            };
            let source = self.relative_source(out_dir, source);
            let dst_line = token.get_dst_line();
            let dst_col = shifts.apply(dst_line as usize, token.get_dst_col() as usize);
            builder.add(
                dst_line,
                u32::try_from(dst_col).unwrap_or(u32::MAX),
                token.get_src_line(),
                token.get_src_col(),
                Some(&source),
                token.get_name(),
                token.is_range(),
            );
        }

        for idx in 0..self.map.get_source_count() {
            if let (Some(source), Some(contents)) =
                (self.map.get_source(idx), self.map.get_source_contents(idx))
            {
                let id = builder.add_source(&self.relative_source(out_dir, source));
                builder.set_source_contents(id, Some(contents));
            }
        }

        builder.into_sourcemap()
    }

    fn relative_source(&self, out_dir: &str, source: &str) -> String {
        self.style.to_slash(&self.style.relative(out_dir, source))
    }
}

/// Serialize a map to JSON.
pub fn to_json(map: &SourceMap) -> Result<String> {
    let mut buf = Vec::new();
    map.to_writer(&mut buf)?;
    String::from_utf8(buf).map_err(|e| SourceMapError::Unsupported(e.to_string()))
}

/// The url of the last `sourceMappingURL` comment in `css`, if any.
pub fn find_reference(css: &str) -> Option<&str> {
    CSS_MAP_REFERENCE
        .captures_iter(css)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// `css` with its last `sourceMappingURL` comment pointing at `url`.
///
/// A comment is appended when `css` has none.
pub fn replace_reference(css: &str, url: &str) -> String {
    let comment = format!("/*# sourceMappingURL={} */", url);
    match CSS_MAP_REFERENCE.find_iter(css).last() {
        Some(m) => format!("{}{}{}", &css[..m.start()], comment, &css[m.end()..]),
        None if css.is_empty() || css.ends_with('\n') => format!("{}{}\n", css, comment),
        None => format!("{}\n{}\n", css, comment),
    }
}

/// Load the map referenced from `css`, if it references one.
///
/// Inline `data:` maps are decoded directly; other references are resolved
/// against the directory of `css_path` and read from disk.
pub fn load_for_css(
    css: &str,
    css_path: &str,
    style: PathStyle,
) -> Result<Option<AbsoluteSourceMap>> {
    let Some(url) = find_reference(css) else {
        return Ok(None);
    };
    let css_dir = style.dirname(css_path);

    if url.starts_with("data:") {
        return AbsoluteSourceMap::from_data_url(url, &css_dir, style).map(Some);
    }

    let reference = url.strip_prefix("file://").unwrap_or(url);
    let map_path = if style.is_absolute(reference) {
        style.normalize(reference)
    } else {
        style.join(&css_dir, reference)
    };
    tracing::debug!("loading source map {} referenced from {}", map_path, css_path);

    AbsoluteSourceMap::from_file(&map_path, style).map(Some)
}

fn absolute_source(source: &str, map_dir: &str, style: PathStyle) -> String {
    let source = source.strip_prefix("file://").unwrap_or(source);
    if style.is_absolute(source) {
        style.normalize(source)
    } else {
        style.join(map_dir, source)
    }
}

fn regular_map(decoded: DecodedMap) -> Result<SourceMap> {
    match decoded {
        DecodedMap::Regular(map) => Ok(map),
        DecodedMap::Index(index) => Ok(index.flatten()?),
        _ => Err(SourceMapError::Unsupported(
            "only regular and indexed maps are supported".to_string(),
        )),
    }
}
