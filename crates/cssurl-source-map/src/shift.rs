//! Generated-column corrections
//!
//! Rewriting a url changes the length of the text it sits in. Everything
//! after it on the same line moves, so mappings recorded against the
//! original generated CSS need their columns adjusted before the map can
//! describe the rewritten CSS. Url contents never span lines, so rows are
//! unaffected.

/// One edited span on a single line of generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnShift {
    /// Row of the edit (0-indexed)
    pub row: usize,
    /// First column of the replaced text
    pub start_column: usize,
    /// Column just past the replaced text
    pub end_column: usize,
    /// New length minus old length, in characters
    pub delta: isize,
}

/// All edits made to one generated file, ordered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnShifts {
    shifts: Vec<ColumnShift>,
}

impl ColumnShifts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit. Edits must not overlap.
    pub fn push(&mut self, shift: ColumnShift) {
        if shift.delta == 0 {
            return;
        }
        let idx = self
            .shifts
            .partition_point(|s| (s.row, s.start_column) < (shift.row, shift.start_column));
        self.shifts.insert(idx, shift);
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Column in the rewritten text for `column` of the original text.
    ///
    /// A position inside a replaced span maps to the start of the
    /// replacement.
    pub fn apply(&self, row: usize, column: usize) -> usize {
        let start = self.shifts.partition_point(|s| s.row < row);
        let mut delta: isize = 0;

        for shift in self.shifts[start..].iter().take_while(|s| s.row == row) {
            if column >= shift.end_column {
                delta += shift.delta;
            } else if column > shift.start_column {
                return offset_column(shift.start_column, delta);
            } else {
                break;
            }
        }

        offset_column(column, delta)
    }
}

fn offset_column(column: usize, delta: isize) -> usize {
    column.saturating_add_signed(delta)
}
