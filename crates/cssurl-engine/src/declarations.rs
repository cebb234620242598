//! Declaration scanner.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Finds `property: value` declarations in CSS text without building a
//! syntax tree. The scanner understands just enough CSS to know where a
//! declaration starts and ends:
//!
//! - comments and quoted strings are opaque
//! - `;`, `{` and `}` inside parentheses do not end anything
//! - a chunk ended by `{` is a selector or at-rule prelude
//! - a chunk ended by `;` or `}` inside a block is a declaration if it has a
//!   top-level `:` and does not start with `@`

use std::ops::Range;

/// A declaration found in CSS text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    /// Property name as written.
    pub property: &'a str,
    /// Value with surrounding whitespace trimmed.
    pub value: &'a str,
    /// Byte offset of the first character of the property.
    pub start: usize,
    /// Byte range of `value` in the scanned text.
    pub value_range: Range<usize>,
}

#[derive(Debug, Default)]
struct Chunk {
    start: Option<usize>,
    colon: Option<usize>,
    at_rule: bool,
}

impl Chunk {
    fn touch(&mut self, idx: usize, byte: u8) {
        if self.start.is_none() {
            self.start = Some(idx);
            self.at_rule = byte == b'@';
        }
    }
}

/// Every declaration in `css`, in document order.
///
/// # Example
///
/// ```
/// use cssurl_engine::scan_declarations;
///
/// let decls = scan_declarations(".a { color: red; background: url(a.png) }");
/// assert_eq!(decls.len(), 2);
/// assert_eq!(decls[1].property, "background");
/// assert_eq!(decls[1].value, "url(a.png)");
/// ```
pub fn scan_declarations(css: &str) -> Vec<Declaration<'_>> {
    let bytes = css.as_bytes();
    let mut declarations = Vec::new();
    let mut chunk = Chunk::default();
    let mut depth: usize = 0;
    let mut parens: usize = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let byte = bytes[idx];
        match byte {
            b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                idx = skip_comment(bytes, idx);
                continue;
            }
            b'"' | b'\'' => {
                chunk.touch(idx, byte);
                idx = skip_string(bytes, idx);
                continue;
            }
            b'\\' => {
                chunk.touch(idx, byte);
                idx += 2;
                continue;
            }
            b'(' => {
                chunk.touch(idx, byte);
                parens += 1;
            }
            b')' => {
                chunk.touch(idx, byte);
                parens = parens.saturating_sub(1);
            }
            b':' if parens == 0 => {
                chunk.touch(idx, byte);
                if chunk.colon.is_none() {
                    chunk.colon = Some(idx);
                }
            }
            b'{' if parens == 0 => {
                depth += 1;
                chunk = Chunk::default();
            }
            b';' if parens == 0 => {
                if depth > 0 {
                    push_declaration(css, &chunk, idx, &mut declarations);
                }
                chunk = Chunk::default();
            }
            b'}' if parens == 0 => {
                if depth > 0 {
                    push_declaration(css, &chunk, idx, &mut declarations);
                }
                depth = depth.saturating_sub(1);
                chunk = Chunk::default();
            }
            b if b.is_ascii_whitespace() => {}
            _ => chunk.touch(idx, byte),
        }
        idx += 1;
    }

    // Unterminated final declaration in an unclosed block
    if depth > 0 {
        push_declaration(css, &chunk, css.len(), &mut declarations);
    }

    declarations
}

fn push_declaration<'a>(css: &'a str, chunk: &Chunk, end: usize, out: &mut Vec<Declaration<'a>>) {
    let (Some(start), Some(colon)) = (chunk.start, chunk.colon) else {
        return;
    };
    if chunk.at_rule {
        return;
    }

    let property = css[start..colon].trim_end();
    if property.is_empty() {
        return;
    }

    let raw = &css[colon + 1..end];
    let leading = raw.len() - raw.trim_start().len();
    let value = raw.trim();
    let value_start = colon + 1 + leading;

    out.push(Declaration {
        property,
        value,
        start,
        value_range: value_start..value_start + value.len(),
    });
}

fn skip_comment(bytes: &[u8], idx: usize) -> usize {
    let mut i = idx + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_string(bytes: &[u8], idx: usize) -> usize {
    let quote = bytes[idx];
    let mut i = idx + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
