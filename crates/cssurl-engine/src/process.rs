/*
 * process.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rewrites url() references in one CSS file.
 */

//! File processing.
//!
//! [`Engine::process`] drives one CSS file through the url rewriter:
//!
//! 1. pick a [`SourceLocator`]: the supplied map, a map referenced from the
//!    CSS, or the CSS file's own directory
//! 2. create a [`Session`], which validates the options
//! 3. for every declaration whose value contains `url(`, look up the
//!    directory the declaration was authored in and transform the value
//! 4. splice the rewritten url contents back into the text and, when asked,
//!    rebuild the source map with shifted columns and point the CSS's
//!    `sourceMappingURL` comment at `<output file>.map`

use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use cssurl_core::{
    DiagnosticSink, LoaderContext, NativeProbe, NullSink, PathProbe, PathStyle, Segment, Session,
    TracingSink,
};
use cssurl_source_map::{
    AbsoluteSourceMap, ColumnShift, ColumnShifts, FileDirectoryLocator, LineIndex, Location,
    SourceLocator, SourceMapError, SourceMapLocator, load_for_css, replace_reference,
};
use serde::Serialize;
use sourcemap::SourceMap;
use tracing::debug;

use crate::config::EngineConfig;
use crate::declarations::scan_declarations;
use crate::error::{EngineError, Result};

/// Warning recorded when a declaration position has no mapping.
pub const UNMAPPED_DECLARATION: &str =
    "source-map information is not available at url() declaration";

/// A non-fatal problem found while processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub message: String,
    /// Position of the declaration in the processed CSS.
    pub location: Location,
    pub property: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.location, self.property, self.message)
    }
}

/// One url that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub location: Location,
    pub property: String,
    /// Directory the declaration was authored in.
    pub directory: String,
    pub before: String,
    pub after: String,
}

/// Result of processing one file.
#[derive(Debug)]
pub struct CssOutput {
    pub css: String,
    /// Rebuilt map, when source-map output is enabled and an input map
    /// existed.
    pub map: Option<SourceMap>,
    pub warnings: Vec<Warning>,
    pub rewrites: Vec<Rewrite>,
}

/// One CSS file to process.
#[derive(Debug, Clone)]
pub struct CssInput<'a> {
    pub css: &'a str,
    /// Path of the CSS file. Referenced maps and the fallback directory are
    /// resolved from it.
    pub path: &'a str,
    /// Where the output will be written; defaults to `path`.
    pub output_path: Option<&'a str>,
    /// An explicitly supplied map. When absent the CSS is searched for a
    /// `sourceMappingURL` reference.
    pub map: Option<AbsoluteSourceMap>,
}

impl<'a> CssInput<'a> {
    pub fn new(css: &'a str, path: &'a str) -> Self {
        Self {
            css,
            path,
            output_path: None,
            map: None,
        }
    }

    pub fn with_output_path(mut self, output_path: &'a str) -> Self {
        self.output_path = Some(output_path);
        self
    }

    pub fn with_map(mut self, map: AbsoluteSourceMap) -> Self {
        self.map = Some(map);
        self
    }
}

/// Processes CSS files with one configuration.
pub struct Engine {
    config: EngineConfig,
    style: PathStyle,
    context_dir: Option<String>,
    probe: Arc<dyn PathProbe>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            style: PathStyle::native(),
            context_dir: None,
            probe: Arc::new(NativeProbe),
            sink: None,
        }
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    /// Directory relative output is expressed against. Defaults to the
    /// directory of the processed file.
    pub fn with_context_dir(mut self, context_dir: impl Into<String>) -> Self {
        self.context_dir = Some(context_dir.into());
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn PathProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Diagnostic sink for sessions. Without one, `debug` selects between
    /// tracing output and nothing.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read a CSS file from disk and process it.
    pub fn process_file(&self, path: &str, output_path: Option<&str>) -> Result<CssOutput> {
        let css = std::fs::read_to_string(Path::new(path)).map_err(|source| EngineError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut input = CssInput::new(&css, path);
        input.output_path = output_path;
        self.process(input)
    }

    pub fn process(&self, input: CssInput<'_>) -> Result<CssOutput> {
        let css: Cow<'_, str> = if self.config.remove_cr && input.css.contains("\r\n") {
            Cow::Owned(input.css.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(input.css)
        };

        let locator = self.locator(&css, input.path, input.map)?;
        let session = self.session(input.path)?;

        let index = LineIndex::new(&css);
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        let mut shifts = ColumnShifts::new();
        let mut warnings = Vec::new();
        let mut rewrites = Vec::new();

        for declaration in scan_declarations(&css) {
            if !declaration.value.contains("url(") {
                continue;
            }
            let Some(location) = index.location(declaration.start, &css) else {
                continue;
            };

            let Some(directory) = locator.original_directory(location) else {
                if !self.config.silent {
                    warnings.push(Warning {
                        message: UNMAPPED_DECLARATION.to_string(),
                        location,
                        property: declaration.property.to_string(),
                    });
                }
                continue;
            };

            for segment in session.transform_segments(declaration.value, &directory) {
                let Segment::Url(token) = segment else {
                    continue;
                };
                if !token.is_rewritten() {
                    continue;
                }

                let start = declaration.value_range.start + token.content_range.start;
                let end = declaration.value_range.start + token.content_range.end;
                let before = &css[start..end];
                if let Some(at) = index.location(start, &css) {
                    let old_len = before.chars().count();
                    let new_len = token.content.chars().count();
                    shifts.push(ColumnShift {
                        row: at.row,
                        start_column: at.column,
                        end_column: at.column + old_len,
                        delta: new_len as isize - old_len as isize,
                    });
                }

                rewrites.push(Rewrite {
                    location,
                    property: declaration.property.to_string(),
                    directory: directory.clone(),
                    before: before.to_string(),
                    after: token.content.to_string(),
                });
                edits.push((start..end, token.content.into_owned()));
            }
        }

        debug!(
            "{}: {} url(s) rewritten, {} warning(s)",
            input.path,
            rewrites.len(),
            warnings.len()
        );

        let mut css = apply_edits(&css, &edits);
        let mut map = None;
        if self.config.source_map {
            let out_path = input.output_path.unwrap_or(input.path);
            let out_dir = self.style.dirname(out_path);
            let file = Path::new(out_path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            map = locator
                .source_map()
                .map(|map| map.rebuild(&shifts, &out_dir, file.as_deref()));
            if let (Some(_), Some(file)) = (&map, &file) {
                css = replace_reference(&css, &format!("{}.map", file));
            }
        }

        Ok(CssOutput {
            css,
            map,
            warnings,
            rewrites,
        })
    }

    fn locator(
        &self,
        css: &str,
        path: &str,
        map: Option<AbsoluteSourceMap>,
    ) -> Result<Box<dyn SourceLocator>> {
        let map = match map {
            Some(map) => Some(map),
            None => load_for_css(css, path, self.style)?,
        };

        match map {
            Some(map) => Ok(Box::new(SourceMapLocator::new(map))),
            None if self.config.require_source_map => {
                Err(SourceMapError::Missing(path.to_string()).into())
            }
            None => {
                debug!("{}: no source map, using the file's own directory", path);
                Ok(Box::new(FileDirectoryLocator::for_file(path, self.style)))
            }
        }
    }

    fn session(&self, path: &str) -> Result<Session> {
        let sink: Arc<dyn DiagnosticSink> = match &self.sink {
            Some(sink) => sink.clone(),
            None if self.config.options.debug => Arc::new(TracingSink),
            None => Arc::new(NullSink),
        };
        let context_dir = match &self.context_dir {
            Some(dir) => dir.clone(),
            None => self.style.dirname(path),
        };

        let loader = LoaderContext::new(context_dir, self.probe.clone(), sink);
        Ok(Session::new(self.config.options.to_options(self.style), loader)?)
    }
}

fn apply_edits(css: &str, edits: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(css.len());
    let mut last = 0;
    for (range, replacement) in edits {
        out.push_str(&css[last..range.start]);
        out.push_str(replacement);
        last = range.end;
    }
    out.push_str(&css[last..]);
    out
}
