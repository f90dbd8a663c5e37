//! Position and location tracking for source code locations
//!
//! This module defines the data structures for representing positions and locations in source code,
//! as well as utilities for converting byte offsets to line/column positions.
//!
//! ## Types
//!
//! - [`Position`] - A line:column position in source code (both zero-based, column in bytes)
//! - [`Range`] - A source code range with start/end positions and byte span
//! - [`SourceLocation`] - Utility for converting byte offsets to positions
//!
//! ## Key Design
//!
//! - **Mandatory locations**: every syntax node carries a `Range`, zero-width for missing nodes
//! - **Byte ranges preserved**: stores both byte spans and line:column positions
//! - **Efficient conversion**: O(log n) binary search for byte-to-position conversion

use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

/// Represents a position in source code (line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Represents a location in source code (start and end positions)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// A zero-width range at a single point.
    pub fn empty_at(offset: usize, position: Position) -> Self {
        Self::new(offset..offset, position, position)
    }

    pub fn is_empty(&self) -> bool {
        self.span.start == self.span.end
    }

    /// Check if a position is contained within this location
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Check if a byte offset falls inside the span (end inclusive)
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.span.start <= offset && offset <= self.span.end
    }

    /// Check if another location overlaps with this location
    pub fn overlaps(&self, other: &Range) -> bool {
        self.contains(other.start)
            || self.contains(other.end)
            || other.contains(self.start)
            || other.contains(self.end)
    }

    /// Build a bounding box that contains all provided ranges.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<Range>
    where
        I: Iterator<Item = &'a Range>,
    {
        let first = ranges.next()?.clone();
        let mut span_start = first.span.start;
        let mut span_end = first.span.end;
        let mut start_pos = first.start;
        let mut end_pos = first.end;

        for range in ranges {
            if range.start < start_pos {
                start_pos = range.start;
                span_start = range.span.start;
            } else if range.start == start_pos {
                span_start = span_start.min(range.span.start);
            }

            if range.end > end_pos {
                end_pos = range.end;
                span_end = range.span.end;
            } else if range.end == end_pos {
                span_end = span_end.max(range.span.end);
            }
        }

        Some(Range::new(span_start..span_end, start_pos, end_pos))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(
            ByteRange { start: 0, end: 0 },
            Position::default(),
            Position::default(),
        )
    }
}

/// Provides fast conversion from byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceLocation {
    /// Create a new SourceLocation from source code
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.len);
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line, column)
    }

    /// Convert a line/column position back to a byte offset, clamped to the source
    pub fn position_to_byte(&self, position: Position) -> usize {
        match self.line_starts.get(position.line) {
            Some(start) => {
                let line_end = self
                    .line_starts
                    .get(position.line + 1)
                    .map(|next| next - 1)
                    .unwrap_or(self.len);
                (start + position.column).min(line_end)
            }
            None => self.len,
        }
    }

    /// Convert a byte range to a location
    pub fn byte_range_to_range(&self, range: &ByteRange<usize>) -> Range {
        Range::new(
            range.clone(),
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_comparison() {
        let pos1 = Position::new(1, 5);
        let pos2 = Position::new(1, 10);
        let pos3 = Position::new(2, 0);

        assert!(pos1 < pos2);
        assert!(pos2 < pos3);
        assert!(pos1 < pos3);
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(0..0, Position::new(1, 0), Position::new(2, 10));

        assert!(range.contains(Position::new(1, 0)));
        assert!(range.contains(Position::new(1, 5)));
        assert!(range.contains(Position::new(2, 0)));
        assert!(range.contains(Position::new(2, 10)));

        assert!(!range.contains(Position::new(0, 5)));
        assert!(!range.contains(Position::new(2, 11)));
        assert!(!range.contains(Position::new(3, 0)));
    }

    #[test]
    fn test_range_overlaps() {
        let range1 = Range::new(0..0, Position::new(1, 0), Position::new(2, 0));
        let range2 = Range::new(0..0, Position::new(1, 5), Position::new(3, 0));
        let range3 = Range::new(0..0, Position::new(3, 0), Position::new(4, 0));

        assert!(range1.overlaps(&range2));
        assert!(range2.overlaps(&range1));
        assert!(!range1.overlaps(&range3));
    }

    #[test]
    fn test_bounding_box() {
        let ranges = [
            Range::new(2..5, Position::new(0, 2), Position::new(0, 5)),
            Range::new(10..15, Position::new(1, 0), Position::new(1, 5)),
        ];

        let bbox = Range::bounding_box(ranges.iter()).unwrap();
        assert_eq!(bbox.span, 2..15);
        assert_eq!(bbox.start, Position::new(0, 2));
        assert_eq!(bbox.end, Position::new(1, 5));
        assert!(Range::bounding_box(std::iter::empty()).is_none());
    }

    #[test]
    fn test_byte_to_position() {
        let loc = SourceLocation::new("MATCH (n)\nRETURN n;");

        assert_eq!(loc.byte_to_position(0), Position::new(0, 0));
        assert_eq!(loc.byte_to_position(6), Position::new(0, 6));
        assert_eq!(loc.byte_to_position(10), Position::new(1, 0));
        assert_eq!(loc.byte_to_position(17), Position::new(1, 7));
        // Past the end clamps to the end of input
        assert_eq!(loc.byte_to_position(99), Position::new(1, 9));
    }

    #[test]
    fn test_position_to_byte() {
        let loc = SourceLocation::new("ab\ncd\n");
        assert_eq!(loc.position_to_byte(Position::new(0, 1)), 1);
        assert_eq!(loc.position_to_byte(Position::new(1, 0)), 3);
        assert_eq!(loc.position_to_byte(Position::new(1, 40)), 5);
        assert_eq!(loc.position_to_byte(Position::new(7, 0)), 6);
    }

    #[test]
    fn test_line_count() {
        let loc = SourceLocation::new("a\nb\nc");
        assert_eq!(loc.line_count(), 3);
        assert_eq!(loc.line_start(2), Some(4));
        assert_eq!(loc.line_start(3), None);
    }
}
