/*
 * classify.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Decides how a url token is addressed.
 */

//! Url classification.
//!
//! Only two kinds of url are ever rewritten:
//!
//! - **relative** urls (`img.png`, `../img.png`), resolved against the
//!   directory of the file that authored the declaration
//! - **absolute** urls (`/img.png`, or a filesystem-absolute path), resolved
//!   against the configured root, and only when a root is configured
//!
//! Everything else (`http:`, `data:`, `//cdn`, `#fragment`, `~module`, empty)
//! is left exactly as written.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::path_style::PathStyle;

/// A leading URL scheme such as `http:` or `data:`.
static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").unwrap());

/// Leading characters that mark template syntax or non-path references.
static TEMPLATE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[{}\[\]#*;,'§$%&(=?`´^°<>]").unwrap());

/// How a url token is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Resolved against the authoring file's directory.
    Relative,
    /// Root-relative (`/x`) or filesystem-absolute; resolved against the root.
    Absolute,
    /// `~module/x`; left to the bundler's module resolution.
    ModuleRelative,
    /// Anything else: schemes, fragments, protocol-relative, empty.
    Unaddressable,
}

/// Whether `uri` names something a bundler could load as a local request.
///
/// `root_enabled` controls whether a leading `/` counts as a request.
/// Windows absolute paths are always requests, whatever the host, because
/// `C:` would otherwise look like a URL scheme.
pub fn is_url_request(uri: &str, root_enabled: bool) -> bool {
    if SCHEME.is_match(uri) && !PathStyle::Windows.is_absolute(uri) {
        return false;
    }
    if uri.starts_with("//") {
        return false;
    }
    if TEMPLATE_START.is_match(uri) {
        return false;
    }
    if !root_enabled && uri.starts_with('/') {
        return false;
    }
    true
}

/// Classifier bound to one session's path style and root setting.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    style: PathStyle,
    root_enabled: bool,
}

impl Classifier {
    /// Create a classifier.
    pub fn new(style: PathStyle, root_enabled: bool) -> Self {
        Self {
            style,
            root_enabled,
        }
    }

    /// True for a non-empty, non-absolute local request not starting with `~`.
    pub fn is_relative(&self, uri: &str) -> bool {
        !uri.is_empty()
            && is_url_request(uri, false)
            && !self.style.is_absolute(uri)
            && !uri.starts_with('~')
    }

    /// True for a root-relative or filesystem-absolute request when a root
    /// is configured.
    pub fn is_absolute(&self, uri: &str) -> bool {
        !uri.is_empty()
            && self.root_enabled
            && is_url_request(uri, true)
            && (uri.starts_with('/') || self.style.is_absolute(uri))
    }

    /// Classify `uri` (without its query or hash).
    pub fn classify(&self, uri: &str) -> UrlKind {
        if self.is_relative(uri) {
            UrlKind::Relative
        } else if self.is_absolute(uri) {
            UrlKind::Absolute
        } else if uri.starts_with('~') {
            UrlKind::ModuleRelative
        } else {
            UrlKind::Unaddressable
        }
    }
}
