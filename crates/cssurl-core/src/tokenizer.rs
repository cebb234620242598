/*
 * tokenizer.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Splits CSS declaration values into literal text and url() statements.
 */

//! `url(...)` statement tokenizer.
//!
//! A declaration value is split into a sequence of [`Segment`]s: literal text
//! that is passed through untouched, and [`UrlToken`]s carrying the content
//! of one `url(...)` statement together with the punctuation around it.
//! [`join_segments`] writes the sequence back out, so splitting and joining
//! an unmodified value reproduces it byte-for-byte.
//!
//! Each alternative of the statement pattern has its own named capture
//! group (`dq`, `sq`, `raw`), so the kind of a match is read off the group
//! that participated instead of a positional offset.

use std::borrow::Cow;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Pattern for a single `url(...)` statement.
///
/// - `prefix`: `url(` with optional inner whitespace
/// - `dq` / `sq`: content of a double/single quoted argument; backslash
///   escapes (including an escaped quote) stay inside the content
/// - `raw`: an unquoted argument; it may not start or end with a quote or
///   whitespace and runs up to the closing paren
/// - `suffix`: optional whitespace and the closing paren
static URL_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<prefix>url\s*\(\s*)(?:"(?P<dq>(?:[^"\\\n]|\\.)*)"|'(?P<sq>(?:[^'\\\n]|\\.)*)'|(?P<raw>[^'"\s)](?:[^)\n]*[^'"\s)])?))(?P<suffix>\s*\))"#,
    )
    .unwrap()
});

/// Quote character delimiting a url argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    None,
}

impl Quote {
    /// The quote as written in CSS (empty for an unquoted argument).
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::Double => "\"",
            Quote::Single => "'",
            Quote::None => "",
        }
    }

    /// Whether the argument was quote-delimited.
    pub fn is_quoted(self) -> bool {
        !matches!(self, Quote::None)
    }
}

/// One `url(...)` statement found in a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlToken<'a> {
    /// `url(` plus any whitespace before the argument.
    pub prefix: &'a str,
    /// Quote style of the argument.
    pub quote: Quote,
    /// Argument content, without quotes. Borrowed until rewritten.
    pub content: Cow<'a, str>,
    /// Whitespace after the argument plus the closing paren.
    pub suffix: &'a str,
    /// Byte range of the original content within the value.
    pub content_range: Range<usize>,
}

impl<'a> UrlToken<'a> {
    /// Replace the content, keeping quotes and punctuation.
    pub fn with_content(mut self, content: String) -> Self {
        self.content = Cow::Owned(content);
        self
    }

    /// Whether the content differs from what was tokenized.
    pub fn is_rewritten(&self) -> bool {
        matches!(self.content, Cow::Owned(_))
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.prefix);
        out.push_str(self.quote.as_str());
        out.push_str(&self.content);
        out.push_str(self.quote.as_str());
        out.push_str(self.suffix);
    }
}

/// A piece of a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any `url(...)` statement.
    Literal(&'a str),
    /// A `url(...)` statement.
    Url(UrlToken<'a>),
}

/// Split a declaration value into literal and url segments.
///
/// Empty literals between adjacent statements are not emitted.
///
/// # Example
///
/// ```
/// use cssurl_core::{Segment, split_value};
///
/// let segments = split_value("url(a.png) no-repeat");
/// assert_eq!(segments.len(), 2);
/// assert!(matches!(segments[0], Segment::Url(_)));
/// assert_eq!(segments[1], Segment::Literal(" no-repeat"));
/// ```
pub fn split_value(value: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for captures in URL_STATEMENT.captures_iter(value) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(&value[last..whole.start()]));
        }
        segments.push(Segment::Url(token_from_captures(&captures, whole.start())));
        last = whole.end();
    }

    if last < value.len() {
        segments.push(Segment::Literal(&value[last..]));
    }

    segments
}

/// Reassemble a value from (possibly rewritten) segments.
pub fn join_segments(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Url(token) => token.write_to(&mut out),
        }
    }
    out
}

fn token_from_captures<'a>(captures: &Captures<'a>, start: usize) -> UrlToken<'a> {
    let (quote, content) = if let Some(m) = captures.name("dq") {
        (Quote::Double, Some(m))
    } else if let Some(m) = captures.name("sq") {
        (Quote::Single, Some(m))
    } else {
        (Quote::None, captures.name("raw"))
    };

    // A statement always matches one alternative, but an absent group is
    // treated as empty content rather than dropped.
    let (content, content_range) = match content {
        Some(m) => (m.as_str(), m.range()),
        None => ("", start..start),
    };

    UrlToken {
        prefix: captures.name("prefix").map_or("", |m| m.as_str()),
        quote,
        content: Cow::Borrowed(content),
        suffix: captures.name("suffix").map_or("", |m| m.as_str()),
        content_range,
    }
}
