/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Optional per-url diagnostic channel.
 */

//! Diagnostic sinks.
//!
//! The diagnostic channel is informational only: it reports which base
//! directories were tried for each url and whether a file was found there.
//! A sink is handed to the session when it is created and lives exactly as
//! long as that session.

use std::sync::Mutex;

/// Receiver for diagnostic lines.
pub trait DiagnosticSink: Send + Sync {
    /// Whether lines should be produced at all.
    ///
    /// Producers check this before formatting or probing anything.
    fn enabled(&self) -> bool {
        true
    }

    /// Record one line.
    fn emit(&self, line: &str);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn enabled(&self) -> bool {
        false
    }

    fn emit(&self, _line: &str) {}
}

/// Forwards lines to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "cssurl::diagnostics", "{}", line);
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines emitted so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let sink = MemorySink::new();
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
        assert!(sink.enabled());
    }

    #[test]
    fn test_null_sink_is_disabled() {
        assert!(!NullSink.enabled());
    }
}
