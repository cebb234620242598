/*
 * path_style.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Platform path semantics as a value rather than a compile-time property.
 */

//! Platform path semantics.
//!
//! Everything in this crate works on path *strings* and asks a [`PathStyle`]
//! how to read them. That keeps Windows drive-letter handling testable on a
//! POSIX host (and vice versa), which `std::path` cannot do.
//!
//! The operations follow Node's `path` module rather than `std::path`:
//! [`PathStyle::join`] concatenates and then normalizes, so joining an
//! absolute second argument does *not* discard the first one.

/// How path strings are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    /// `/` separated, absolute iff it starts with `/`.
    Posix,
    /// `\` or `/` separated, with drive letters and UNC-style roots.
    Windows,
}

/// Leading root of a path string.
struct Root<'a> {
    /// The root exactly as written.
    raw: &'a str,
    /// Whether the root makes the path absolute.
    absolute: bool,
}

impl PathStyle {
    /// Style of the host platform.
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    /// The preferred separator.
    pub fn separator(self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Whether `c` separates path segments in this style.
    pub fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Posix => c == '/',
            PathStyle::Windows => c == '/' || c == '\\',
        }
    }

    /// Whether `path` is absolute in this style.
    ///
    /// For Windows this covers `C:\dir`, `C:/dir` and rooted `\dir` paths,
    /// but not the drive-relative form `C:dir`.
    pub fn is_absolute(self, path: &str) -> bool {
        self.root(path).absolute
    }

    /// Collapse `.` and `..` segments and duplicate separators.
    ///
    /// `..` never climbs above the root of an absolute path. An empty result
    /// is returned as `.`.
    pub fn normalize(self, path: &str) -> String {
        let root = self.root(path);
        let rest = &path[root.raw.len()..];

        let mut parts: Vec<&str> = Vec::new();
        for segment in rest.split(|c| self.is_separator(c)) {
            match segment {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(last) if *last != ".." => {
                        parts.pop();
                    }
                    _ if root.absolute => {}
                    _ => parts.push(".."),
                },
                other => parts.push(other),
            }
        }

        let mut result = self.canonical_root(&root);
        result.push_str(&parts.join(&self.separator().to_string()));
        if result.is_empty() {
            ".".to_string()
        } else {
            result
        }
    }

    /// Concatenate `base` and `path` with a separator, then normalize.
    pub fn join(self, base: &str, path: &str) -> String {
        match (base.is_empty(), path.is_empty()) {
            (true, true) => ".".to_string(),
            (true, false) => self.normalize(path),
            (false, true) => self.normalize(base),
            (false, false) => self.normalize(&format!("{}{}{}", base, self.separator(), path)),
        }
    }

    /// The directory portion of `path`.
    ///
    /// Returns `.` for a bare file name and the root itself for a path that
    /// has nothing above its first segment.
    pub fn dirname(self, path: &str) -> String {
        let root = self.root(path);
        let rest = path[root.raw.len()..].trim_end_matches(|c| self.is_separator(c));

        match rest.rfind(|c| self.is_separator(c)) {
            Some(idx) => {
                let dir = rest[..idx].trim_end_matches(|c| self.is_separator(c));
                format!("{}{}", root.raw, dir)
            }
            None if root.raw.is_empty() => ".".to_string(),
            None => root.raw.to_string(),
        }
    }

    /// The path from `from` to `to`, expressed with `..` segments as needed.
    ///
    /// Both arguments are normalized first. Identical paths give an empty
    /// string. Paths on different roots (e.g. different Windows drives)
    /// cannot be related, so the normalized `to` is returned.
    pub fn relative(self, from: &str, to: &str) -> String {
        let from = self.normalize(from);
        let to = self.normalize(to);

        let from_root = self.root(&from);
        let to_root = self.root(&to);
        if !self.same_segment(from_root.raw, to_root.raw) {
            return to;
        }

        let from_parts = self.segments(&from[from_root.raw.len()..]);
        let to_parts = self.segments(&to[to_root.raw.len()..]);

        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| self.same_segment(a, b))
            .count();

        let mut parts: Vec<&str> = Vec::new();
        for _ in common..from_parts.len() {
            parts.push("..");
        }
        parts.extend_from_slice(&to_parts[common..]);
        parts.join(&self.separator().to_string())
    }

    /// Rewrite this style's separators as `/`.
    pub fn to_slash(self, path: &str) -> String {
        match self {
            PathStyle::Posix => path.to_string(),
            PathStyle::Windows => path.replace('\\', "/"),
        }
    }

    fn segments(self, path: &str) -> Vec<&str> {
        path.split(|c| self.is_separator(c))
            .filter(|s| !s.is_empty() && *s != ".")
            .collect()
    }

    fn same_segment(self, a: &str, b: &str) -> bool {
        match self {
            PathStyle::Posix => a == b,
            PathStyle::Windows => a.eq_ignore_ascii_case(b),
        }
    }

    fn root(self, path: &str) -> Root<'_> {
        match self {
            PathStyle::Posix => {
                let len = path.len() - path.trim_start_matches('/').len();
                Root {
                    raw: &path[..len],
                    absolute: len > 0,
                }
            }
            PathStyle::Windows => {
                let bytes = path.as_bytes();
                if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
                    let after = &path[2..];
                    let seps = after.len() - after.trim_start_matches(['/', '\\']).len();
                    Root {
                        raw: &path[..2 + seps],
                        absolute: seps > 0,
                    }
                } else {
                    let len = path.len() - path.trim_start_matches(['/', '\\']).len();
                    Root {
                        raw: &path[..len],
                        absolute: len > 0,
                    }
                }
            }
        }
    }

    fn canonical_root(self, root: &Root<'_>) -> String {
        match self {
            PathStyle::Posix if root.absolute => "/".to_string(),
            PathStyle::Posix => String::new(),
            PathStyle::Windows => {
                let drive = root.raw.trim_end_matches(['/', '\\']);
                if root.absolute {
                    format!("{}\\", drive)
                } else {
                    drive.to_string()
                }
            }
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posix_is_absolute() {
        assert!(PathStyle::Posix.is_absolute("/project/src"));
        assert!(!PathStyle::Posix.is_absolute("src/img.png"));
        assert!(!PathStyle::Posix.is_absolute("C:\\project"));
    }

    #[test]
    fn test_windows_is_absolute() {
        assert!(PathStyle::Windows.is_absolute("C:\\project"));
        assert!(PathStyle::Windows.is_absolute("c:/project"));
        assert!(PathStyle::Windows.is_absolute("\\project"));
        assert!(!PathStyle::Windows.is_absolute("C:project"));
        assert!(!PathStyle::Windows.is_absolute("images\\img.png"));
    }

    #[test]
    fn test_normalize_collapses_dots() {
        let style = PathStyle::Posix;
        assert_eq!(style.normalize("/a/b/../c/./d"), "/a/c/d");
        assert_eq!(style.normalize("/a//b///c"), "/a/b/c");
        assert_eq!(style.normalize("a/../../b"), "../b");
        assert_eq!(style.normalize("/../a"), "/a");
        assert_eq!(style.normalize(""), ".");
        assert_eq!(style.normalize("./"), ".");
    }

    #[test]
    fn test_normalize_windows() {
        let style = PathStyle::Windows;
        assert_eq!(style.normalize("C:/a/b/../c"), "C:\\a\\c");
        assert_eq!(style.normalize("C:\\a\\.\\b\\"), "C:\\a\\b");
        assert_eq!(style.normalize("\\a/b"), "\\a\\b");
    }

    #[test]
    fn test_join_keeps_base_for_rooted_path() {
        let style = PathStyle::Posix;
        assert_eq!(
            style.join("/project", "/images/img.jpg"),
            "/project/images/img.jpg"
        );
        assert_eq!(
            style.join("/project/src/feature", "../images/img.jpg"),
            "/project/src/images/img.jpg"
        );
        assert_eq!(style.join("", "a/b"), "a/b");
        assert_eq!(style.join("", ""), ".");
    }

    #[test]
    fn test_dirname() {
        let style = PathStyle::Posix;
        assert_eq!(style.dirname("/project/src/main.scss"), "/project/src");
        assert_eq!(style.dirname("/main.scss"), "/");
        assert_eq!(style.dirname("main.scss"), ".");
        assert_eq!(style.dirname("/project/src/"), "/project");

        let win = PathStyle::Windows;
        assert_eq!(win.dirname("C:\\project\\main.scss"), "C:\\project");
        assert_eq!(win.dirname("C:\\main.scss"), "C:\\");
    }

    #[test]
    fn test_relative() {
        let style = PathStyle::Posix;
        assert_eq!(
            style.relative("/project/dist", "/project/src/images/img.jpg"),
            "../src/images/img.jpg"
        );
        assert_eq!(style.relative("/project", "/project/img.jpg"), "img.jpg");
        assert_eq!(style.relative("/project", "/project"), "");
    }

    #[test]
    fn test_relative_windows_case_insensitive() {
        let style = PathStyle::Windows;
        assert_eq!(
            style.relative("C:\\Project\\dist", "c:\\project\\src\\img.jpg"),
            "..\\src\\img.jpg"
        );
        assert_eq!(style.relative("C:\\a", "D:\\b"), "D:\\b");
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(PathStyle::Windows.to_slash("..\\src\\img.jpg"), "../src/img.jpg");
        assert_eq!(PathStyle::Posix.to_slash("a\\b"), "a\\b");
    }
}
