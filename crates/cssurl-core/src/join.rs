/*
 * join.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Pluggable strategies turning (base directory, uri) into a path.
 */

//! Join strategies.
//!
//! A [`Join`] turns a base directory and a uri into an absolute path. Joins
//! are created once per session by a [`JoinFactory`], which sees the session
//! options and loader context. A factory that cannot work with what it is
//! given returns a [`ConfigError`], so a bad strategy is reported before the
//! first declaration is touched rather than in the middle of a stylesheet.
//!
//! Two strategies are built in:
//!
//! - [`DefaultJoin`]: join and normalize, nothing else
//! - [`SearchJoin`]: try the base directory and then its ancestors, keeping
//!   the first candidate where the file exists
//!
//! Returning an empty string from [`Join::join`] means "could not resolve";
//! the url is then left exactly as authored.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::diagnostics::DiagnosticSink;
use crate::error::ConfigError;
use crate::options::Options;
use crate::path_style::PathStyle;
use crate::probe::PathProbe;
use crate::transform::LoaderContext;

/// Resolves a uri against a base directory.
pub trait Join: Send + Sync {
    /// Produce an absolute path for `uri` (query and hash already removed).
    ///
    /// `token` is the url content as written in the stylesheet and is only
    /// used for diagnostics. An empty result leaves the url untouched.
    fn join(&self, base_dir: &str, uri: &str, token: &str) -> String;
}

/// Everything a [`JoinFactory`] may look at when building a join.
pub struct JoinContext<'a> {
    /// Session options.
    pub options: &'a Options,
    /// The file being processed and the session's probe and sink.
    pub loader: &'a LoaderContext,
}

/// Builds the [`Join`] used by one session.
pub trait JoinFactory: Send + Sync + fmt::Debug {
    /// Name used in diagnostics and errors.
    fn name(&self) -> &str;

    /// Build a join for this session, or refuse with a configuration error.
    fn build(&self, ctx: &JoinContext<'_>) -> Result<Box<dyn Join>, ConfigError>;
}

/// Probe and sink pair used to produce diagnostic lines.
#[derive(Clone)]
struct Reporter {
    probe: Arc<dyn PathProbe>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Reporter {
    fn from_loader(loader: &LoaderContext) -> Self {
        Self {
            probe: loader.probe.clone(),
            sink: loader.sink.clone(),
        }
    }

    /// First candidate under which `uri` exists as a file.
    ///
    /// Probe failures count as "not found".
    fn first_existing(&self, style: PathStyle, candidates: &[String], uri: &str) -> Option<String> {
        candidates.iter().find_map(|base| {
            let path = style.join(base, uri);
            match self.probe.is_file(Path::new(&path)) {
                Ok(true) => Some(path),
                Ok(false) => None,
                Err(e) => {
                    tracing::debug!("probing {} failed: {}", path, e);
                    None
                }
            }
        })
    }

    fn report(&self, token: &str, candidates: &[String], found: bool) {
        self.sink.emit(&format!(
            "url({}) tried [{}] {}",
            token,
            candidates.join(", "),
            if found { "FOUND" } else { "NOT FOUND" }
        ));
    }
}

/// Joins and normalizes using the session's path style.
pub struct DefaultJoin {
    style: PathStyle,
    reporter: Option<Reporter>,
}

impl DefaultJoin {
    pub fn new(style: PathStyle) -> Self {
        Self {
            style,
            reporter: None,
        }
    }
}

impl Join for DefaultJoin {
    fn join(&self, base_dir: &str, uri: &str, token: &str) -> String {
        let path = self.style.join(base_dir, uri);
        if let Some(reporter) = &self.reporter {
            let candidates = [base_dir.to_string()];
            let found = reporter
                .first_existing(self.style, &candidates, uri)
                .is_some();
            reporter.report(token, &candidates, found);
        }
        path
    }
}

/// Factory for [`DefaultJoin`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultJoinFactory;

impl JoinFactory for DefaultJoinFactory {
    fn name(&self) -> &str {
        "default"
    }

    fn build(&self, ctx: &JoinContext<'_>) -> Result<Box<dyn Join>, ConfigError> {
        let reporter = ctx
            .loader
            .sink
            .enabled()
            .then(|| Reporter::from_loader(ctx.loader));
        Ok(Box::new(DefaultJoin {
            style: ctx.options.style(),
            reporter,
        }))
    }
}

/// Searches the base directory and up to `depth` of its ancestors.
///
/// The first candidate where the file exists wins. When none exists the
/// base directory itself is used, so the result is never worse than
/// [`DefaultJoin`].
pub struct SearchJoin {
    style: PathStyle,
    depth: usize,
    reporter: Reporter,
}

impl SearchJoin {
    pub fn new(
        style: PathStyle,
        depth: usize,
        probe: Arc<dyn PathProbe>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            style,
            depth,
            reporter: Reporter { probe, sink },
        }
    }

    /// Candidate base directories, most specific first.
    pub fn candidates(&self, base_dir: &str) -> Vec<String> {
        let mut candidates = vec![self.style.normalize(base_dir)];
        for _ in 0..self.depth {
            let Some(current) = candidates.last() else {
                break;
            };
            let parent = self.style.dirname(current);
            if parent == *current {
                break;
            }
            candidates.push(parent);
        }
        candidates
    }
}

impl Join for SearchJoin {
    fn join(&self, base_dir: &str, uri: &str, token: &str) -> String {
        let candidates = self.candidates(base_dir);
        let found = self.reporter.first_existing(self.style, &candidates, uri);

        if self.reporter.sink.enabled() {
            self.reporter.report(token, &candidates, found.is_some());
        }

        found.unwrap_or_else(|| self.style.join(&candidates[0], uri))
    }
}

/// Factory for [`SearchJoin`].
#[derive(Debug, Clone, Copy)]
pub struct SearchJoinFactory {
    pub depth: usize,
}

impl SearchJoinFactory {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }
}

impl JoinFactory for SearchJoinFactory {
    fn name(&self) -> &str {
        "search"
    }

    fn build(&self, ctx: &JoinContext<'_>) -> Result<Box<dyn Join>, ConfigError> {
        Ok(Box::new(SearchJoin::new(
            ctx.options.style(),
            self.depth,
            ctx.loader.probe.clone(),
            ctx.loader.sink.clone(),
        )))
    }
}
