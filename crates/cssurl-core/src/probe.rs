/*
 * probe.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Read-only filesystem probing.
 */

//! Filesystem probing.
//!
//! Resolution itself never touches the filesystem. Probing is used in two
//! places only: validating the configured root once per session, and the
//! search join, which checks candidate locations and reports what it found.
//! Both go through [`PathProbe`] so they can run against an in-memory tree.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// Type of filesystem path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Read-only view of a filesystem.
pub trait PathProbe: Send + Sync {
    /// Check whether `path` exists, optionally requiring a specific kind.
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> io::Result<bool>;

    /// Shorthand for an existing directory.
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        self.path_exists(path, Some(PathKind::Directory))
    }

    /// Shorthand for an existing regular file.
    fn is_file(&self, path: &Path) -> io::Result<bool> {
        self.path_exists(path, Some(PathKind::File))
    }
}

/// Probe backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProbe;

impl NativeProbe {
    pub fn new() -> Self {
        Self
    }
}

impl PathProbe for NativeProbe {
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> io::Result<bool> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(match kind {
            None => true,
            Some(PathKind::File) => metadata.is_file(),
            Some(PathKind::Directory) => metadata.is_dir(),
        })
    }
}

/// Probe over an explicit set of files and directories.
///
/// Every ancestor of an added file is registered as a directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe {
    files: HashSet<PathBuf>,
    directories: HashSet<PathBuf>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and its ancestor directories.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.insert(path);
        self
    }

    /// Register a directory.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.directories.insert(path.into());
        self
    }
}

impl PathProbe for MemoryProbe {
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> io::Result<bool> {
        Ok(match kind {
            None => self.files.contains(path) || self.directories.contains(path),
            Some(PathKind::File) => self.files.contains(path),
            Some(PathKind::Directory) => self.directories.contains(path),
        })
    }
}
