/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The per-declaration url transform.
 */

//! Per-declaration transform.
//!
//! A [`Session`] covers one processed file. It is created from [`Options`]
//! and a [`LoaderContext`]; creation validates the options and builds the
//! join, so every configuration error surfaces before any value is
//! transformed. After that, [`Session::transform_value`] is a pure function
//! of the value and the directory it was authored in.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::classify::{Classifier, UrlKind};
use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::error::ConfigError;
use crate::join::{Join, JoinContext};
use crate::options::Options;
use crate::probe::{NativeProbe, PathProbe};
use crate::tokenizer::{Segment, join_segments, split_value};

/// A Windows drive or UNC path, with either separator.
static WINDOWS_ABSOLUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[a-zA-Z]:[/\\]|[/\\]{2})").unwrap());

/// Everything up to a `~` that precedes any query string.
static MODULE_REQUEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^?]*~").unwrap());

/// The host side of a session: the file being processed plus the probe and
/// diagnostic sink the session may use.
#[derive(Clone)]
pub struct LoaderContext {
    /// Directory of the file being processed. Relative output is expressed
    /// against this directory.
    pub context_dir: String,
    /// Read-only filesystem access.
    pub probe: Arc<dyn PathProbe>,
    /// Diagnostic channel.
    pub sink: Arc<dyn DiagnosticSink>,
}

impl LoaderContext {
    pub fn new(
        context_dir: impl Into<String>,
        probe: Arc<dyn PathProbe>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            context_dir: context_dir.into(),
            probe,
            sink,
        }
    }

    /// Native filesystem probe, diagnostics disabled.
    pub fn native(context_dir: impl Into<String>) -> Self {
        Self::new(context_dir, Arc::new(NativeProbe), Arc::new(NullSink))
    }

    pub fn with_probe(mut self, probe: Arc<dyn PathProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }
}

/// Url rewriting for one processed file.
pub struct Session {
    options: Options,
    loader: LoaderContext,
    classifier: Classifier,
    join: Box<dyn Join>,
}

impl Session {
    /// Validate `options` and build the session's join.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::RootNotAbsolute`] / [`ConfigError::RootNotDirectory`]
    ///   when a root is set but unusable
    /// - [`ConfigError::JoinRejected`] (or any other error) from the join
    ///   factory
    pub fn new(options: Options, loader: LoaderContext) -> Result<Self, ConfigError> {
        validate_root(&options, &loader)?;

        let join = options.join_factory().build(&JoinContext {
            options: &options,
            loader: &loader,
        })?;
        let classifier = Classifier::new(options.style(), options.root().is_some());

        debug!(
            "url session for {} ({:?}, join={})",
            loader.context_dir,
            options.style(),
            options.join_factory().name()
        );

        Ok(Self {
            options,
            loader,
            classifier,
            join,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn context_dir(&self) -> &str {
        &self.loader.context_dir
    }

    /// Rewrite every url in `value`, resolving relative ones against
    /// `directory` (the original authoring directory of the declaration).
    ///
    /// Urls that cannot be resolved are left exactly as written.
    pub fn transform_value(&self, value: &str, directory: &str) -> String {
        join_segments(&self.transform_segments(value, directory))
    }

    /// Like [`transform_value`](Self::transform_value) but keeps the
    /// segments, so callers can see which urls changed and where.
    pub fn transform_segments<'a>(&self, value: &'a str, directory: &str) -> Vec<Segment<'a>> {
        split_value(value)
            .into_iter()
            .map(|segment| match segment {
                Segment::Url(token) => {
                    match self.rewrite(&token.content, token.quote.is_quoted(), directory) {
                        Some(content) => Segment::Url(token.with_content(content)),
                        None => Segment::Url(token),
                    }
                }
                literal => literal,
            })
            .collect()
    }

    /// Rewrite the content of a single url token.
    ///
    /// Returns `None` when the url is to be left as written: it is not
    /// addressable, or the join produced an empty path.
    pub fn rewrite(&self, content: &str, quoted: bool, directory: &str) -> Option<String> {
        let unescaped: Cow<'_, str> = if quoted && content.contains(r"\\") {
            Cow::Owned(content.replace(r"\\", r"\"))
        } else {
            Cow::Borrowed(content)
        };
        let (uri, query) = split_query(&unescaped);

        let absolute = match self.classifier.classify(uri) {
            UrlKind::Relative => self.join.join(directory, uri, content),
            UrlKind::Absolute => match self.options.root() {
                Some(root) => self.join.join(root, uri, content),
                None => return None,
            },
            kind => {
                debug!("leaving url({}) as written: {:?}", content, kind);
                return None;
            }
        };

        if absolute.is_empty() {
            debug!("join produced no path for url({})", content);
            return None;
        }

        let style = self.options.style();
        let query = if self.options.keep_query() { query } else { "" };

        let rewritten = if self.options.absolute() {
            format!("{}{}", style.to_slash(&absolute), query)
        } else {
            let relative = style.relative(&self.loader.context_dir, &absolute);
            url_to_request(&format!("{}{}", style.to_slash(&relative), query))
        };

        debug!("url({}) -> url({})", content, rewritten);
        Some(rewritten)
    }
}

/// Split a url into the path part and its `?query` / `#hash` suffix.
///
/// The suffix starts at the first `?` or `#` and keeps that character.
pub fn split_query(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    }
}

/// Encode a relative path as a local request.
///
/// Paths already starting with `./` or `../` and Windows absolute paths are
/// kept; anything else gets a `./` prefix so bundlers do not mistake it for
/// a package name. A `~` before any query string marks a module request and
/// everything up to it is dropped.
pub fn url_to_request(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    let keep = WINDOWS_ABSOLUTE.is_match(url) || url.starts_with("./") || url.starts_with("../");
    let request = if keep {
        url.to_string()
    } else {
        format!("./{}", url)
    };

    MODULE_REQUEST.replace(&request, "").into_owned()
}

fn validate_root(options: &Options, loader: &LoaderContext) -> Result<(), ConfigError> {
    let Some(root) = options.root() else {
        return Ok(());
    };

    if !options.style().is_absolute(root) {
        return Err(ConfigError::RootNotAbsolute(root.to_string()));
    }

    match loader.probe.is_dir(Path::new(root)) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ConfigError::RootNotDirectory(root.to_string())),
        Err(source) => Err(ConfigError::RootProbe {
            root: root.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_style::PathStyle;
    use crate::probe::MemoryProbe;

    fn session(options: Options, context_dir: &str) -> Session {
        let probe = MemoryProbe::new().with_dir("/project");
        let loader = LoaderContext::native(context_dir).with_probe(Arc::new(probe));
        Session::new(options.with_style(PathStyle::Posix), loader).unwrap()
    }

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("img.jpg?v=1#frag"), ("img.jpg", "?v=1#frag"));
        assert_eq!(split_query("font.svg#icon"), ("font.svg", "#icon"));
        assert_eq!(split_query("img.jpg"), ("img.jpg", ""));
        assert_eq!(split_query("?only"), ("", "?only"));
    }

    #[test]
    fn test_url_to_request() {
        assert_eq!(url_to_request("images/a.png"), "./images/a.png");
        assert_eq!(url_to_request("./a.png"), "./a.png");
        assert_eq!(url_to_request("../a.png"), "../a.png");
        assert_eq!(url_to_request("C:\\a.png"), "C:\\a.png");
        assert_eq!(url_to_request("C:/a.png"), "C:/a.png");
        assert_eq!(url_to_request("//server/share/a.png"), "//server/share/a.png");
        assert_eq!(url_to_request(""), "");
        assert_eq!(url_to_request("~pkg/a.png"), "pkg/a.png");
        assert_eq!(url_to_request("a.png?x=~y"), "./a.png?x=~y");
    }

    #[test]
    fn test_relative_mode_uses_context_dir() {
        let s = session(Options::new(), "/project/dist");
        assert_eq!(
            s.transform_value("url('../images/img.jpg')", "/project/src/feature"),
            "url('../src/images/img.jpg')"
        );
    }

    #[test]
    fn test_relative_mode_adds_local_prefix() {
        let s = session(Options::new(), "/project/src");
        assert_eq!(
            s.transform_value("url(feature/img.jpg)", "/project/src"),
            "url(./feature/img.jpg)"
        );
    }

    #[test]
    fn test_absolute_mode() {
        let s = session(Options::new().with_absolute(true), "/project/dist");
        assert_eq!(
            s.transform_value("url(\"../images/img.jpg\")", "/project/src/feature"),
            "url(\"/project/src/images/img.jpg\")"
        );
    }

    #[test]
    fn test_escaped_backslashes_unescaped_in_quoted_tokens() {
        let s = Session::new(
            Options::new()
                .with_style(PathStyle::Windows)
                .with_absolute(true),
            LoaderContext::native("C:\\project\\dist"),
        )
        .unwrap();
        assert_eq!(
            s.transform_value(r#"url("images\\img.jpg")"#, "C:\\project\\src"),
            r#"url("C:/project/src/images/img.jpg")"#
        );
    }

    #[test]
    fn test_unaddressable_passes_through() {
        let s = session(Options::new().with_root("/project"), "/project/dist");
        let value = "url(http://x/a.png), url('data:image/png;base64,AAAA'), url(~pkg/a.png), url(#f)";
        assert_eq!(s.transform_value(value, "/project/src"), value);
    }

    #[test]
    fn test_empty_join_result_passes_through() {
        #[derive(Debug)]
        struct EmptyFactory;
        struct EmptyJoin;
        impl Join for EmptyJoin {
            fn join(&self, _base_dir: &str, _uri: &str, _token: &str) -> String {
                String::new()
            }
        }
        impl crate::join::JoinFactory for EmptyFactory {
            fn name(&self) -> &str {
                "empty"
            }
            fn build(&self, _ctx: &JoinContext<'_>) -> Result<Box<dyn Join>, ConfigError> {
                Ok(Box::new(EmptyJoin))
            }
        }

        let s = session(Options::new().with_join(Arc::new(EmptyFactory)), "/project");
        assert_eq!(s.transform_value("url(a.png)", "/project/src"), "url(a.png)");
    }

    #[test]
    fn test_root_must_be_absolute() {
        let result = Session::new(
            Options::new()
                .with_style(PathStyle::Posix)
                .with_root("relative/root"),
            LoaderContext::native("/project"),
        );
        assert!(matches!(result, Err(ConfigError::RootNotAbsolute(_))));
    }

    #[test]
    fn test_root_must_exist() {
        let loader = LoaderContext::native("/project").with_probe(Arc::new(MemoryProbe::new()));
        let result = Session::new(
            Options::new()
                .with_style(PathStyle::Posix)
                .with_root("/missing"),
            loader,
        );
        assert!(matches!(result, Err(ConfigError::RootNotDirectory(_))));
    }
}
