//! Efficient offset to location lookups

use crate::types::Location;

/// Line-break index over a piece of text
///
/// Stores the byte offset of every newline so that converting a byte offset
/// to a (row, column) pair is a binary search plus a scan of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offsets of each newline character
    line_breaks: Vec<usize>,

    /// Total length of the text in bytes
    total_length: usize,
}

impl LineIndex {
    /// Build an index by scanning `content` once.
    pub fn new(content: &str) -> Self {
        let line_breaks: Vec<usize> = content
            .char_indices()
            .filter_map(|(idx, ch)| if ch == '\n' { Some(idx) } else { None })
            .collect();

        LineIndex {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset into `content` to a Location.
    ///
    /// `content` must be the text the index was built from. Columns are
    /// counted in characters. Returns None if the offset is out of bounds
    /// or not on a character boundary.
    ///
    /// # Example
    ///
    /// ```
    /// use cssurl_source_map::LineIndex;
    ///
    /// let text = "a {\n  b: c;\n}";
    /// let index = LineIndex::new(text);
    /// let loc = index.location(6, text).unwrap();
    /// assert_eq!((loc.row, loc.column), (1, 2));
    /// ```
    pub fn location(&self, offset: usize, content: &str) -> Option<Location> {
        if offset > self.total_length || !content.is_char_boundary(offset) {
            return None;
        }

        // An offset exactly at a newline belongs to the line it terminates
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };

        let line_start = self.line_start(row);
        let column = content[line_start..offset].chars().count();

        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Byte offset where `row` starts.
    pub fn line_start(&self, row: usize) -> usize {
        if row == 0 {
            0
        } else {
            self.line_breaks[row - 1] + 1
        }
    }

    /// Get the number of lines
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
