//! Character-granular positions.
//!
//! Nodes carry [`TextRange`]s of character offsets. A [`LineIndex`] turns
//! those into 1-based [`SourceSpan`]s when diagnostics are produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Half-open range of character offsets into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {}..{}", start, end);
        Self { start, end }
    }

    /// Range covering a single character.
    pub fn char_at(offset: usize) -> Self {
        Self::new(offset, offset + 1)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A resolved location, 1-based. The end column is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// U+FEFF at the start of a file. It occupies offset 0 but no column.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Maps character offsets to line/column pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Character offset of the first character of each line.
    line_starts: Vec<usize>,
    /// Total number of characters in the text.
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let first_line = usize::from(text.starts_with(BYTE_ORDER_MARK));
        let mut line_starts = vec![first_line];
        let mut len = 0;
        for (i, c) in text.chars().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
            len = i + 1;
        }
        Self { line_starts, len }
    }

    /// Number of characters in the indexed text.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve an offset to `(line, column)`, both 1-based.
    ///
    /// The offset one past the last character is valid so that exclusive
    /// range ends resolve.
    pub fn line_col(&self, offset: usize) -> Result<(usize, usize), AnalysisError> {
        if offset > self.len {
            return Err(AnalysisError::UnresolvedLocation {
                offset,
                len: self.len,
            });
        }
        // Index of the last line starting at or before the offset.
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Ok((line + 1, offset.saturating_sub(self.line_starts[line]) + 1))
    }

    pub fn span(&self, range: TextRange) -> Result<SourceSpan, AnalysisError> {
        let (start_line, start_column) = self.line_col(range.start)?;
        let (end_line, end_column) = self.line_col(range.end)?;
        Ok(SourceSpan {
            start_line,
            start_column,
            end_line,
            end_column,
        })
    }
}
