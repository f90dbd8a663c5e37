//! Text edits
//!
//!     An [`InputEdit`] describes one replacement in the source text, in both byte offsets
//!     and line/column positions. It is applied to an old tree with [`Tree::edit`] before the
//!     tree is handed back to the parser for an incremental re-parse.
//!
//! [`Tree::edit`]: super::tree::Tree::edit

use super::range::{Position, SourceLocation};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_position: Position,
    pub old_end_position: Position,
    pub new_end_position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit range {start}..{end} is inverted")]
    Inverted { start: usize, end: usize },
    #[error("edit range ends at {end}, past the end of the source ({len} bytes)")]
    OutOfBounds { end: usize, len: usize },
    #[error("edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

impl InputEdit {
    /// Describe replacing `range` of `old_source` with `new_text`.
    pub fn replace(
        old_source: &str,
        range: std::ops::Range<usize>,
        new_text: &str,
    ) -> Result<InputEdit, EditError> {
        if range.start > range.end {
            return Err(EditError::Inverted {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > old_source.len() {
            return Err(EditError::OutOfBounds {
                end: range.end,
                len: old_source.len(),
            });
        }
        for offset in [range.start, range.end] {
            if !old_source.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }

        let location = SourceLocation::new(old_source);
        let start_position = location.byte_to_position(range.start);
        let old_end_position = location.byte_to_position(range.end);

        Ok(InputEdit {
            start_byte: range.start,
            old_end_byte: range.end,
            new_end_byte: range.start + new_text.len(),
            start_position,
            old_end_position,
            new_end_position: advance(start_position, new_text),
        })
    }

    /// The single edit turning `old_source` into `new_source`, found by trimming their
    /// common prefix and suffix. `None` when the texts are identical.
    pub fn between(old_source: &str, new_source: &str) -> Option<InputEdit> {
        if old_source == new_source {
            return None;
        }

        let mut prefix = old_source
            .bytes()
            .zip(new_source.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        while !old_source.is_char_boundary(prefix) || !new_source.is_char_boundary(prefix) {
            prefix -= 1;
        }

        let max_suffix = old_source.len().min(new_source.len()) - prefix;
        let mut suffix = old_source
            .bytes()
            .rev()
            .zip(new_source.bytes().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();
        while !old_source.is_char_boundary(old_source.len() - suffix)
            || !new_source.is_char_boundary(new_source.len() - suffix)
        {
            suffix -= 1;
        }

        let old_end = old_source.len() - suffix;
        let new_end = new_source.len() - suffix;
        InputEdit::replace(old_source, prefix..old_end, &new_source[prefix..new_end]).ok()
    }

    /// Map a byte offset in the old text to the new text.
    pub fn shift_byte(&self, offset: usize) -> usize {
        if offset >= self.old_end_byte {
            offset - self.old_end_byte + self.new_end_byte
        } else if offset > self.start_byte {
            offset.min(self.new_end_byte)
        } else {
            offset
        }
    }

    /// Map a position in the old text to the new text.
    pub fn shift_position(&self, position: Position) -> Position {
        if position >= self.old_end_position {
            if position.line == self.old_end_position.line {
                Position::new(
                    self.new_end_position.line,
                    self.new_end_position.column + (position.column - self.old_end_position.column),
                )
            } else {
                Position::new(
                    position.line - self.old_end_position.line + self.new_end_position.line,
                    position.column,
                )
            }
        } else if position > self.start_position {
            position.min(self.new_end_position)
        } else {
            position
        }
    }

    /// Whether the inclusive byte range `start..=end` of the old text touches the edit.
    pub fn touches(&self, start: usize, end: usize) -> bool {
        self.start_byte <= end && start <= self.old_end_byte
    }
}

/// Position reached after writing `text` starting at `start`.
fn advance(start: Position, text: &str) -> Position {
    match text.rfind('\n') {
        Some(last_newline) => Position::new(
            start.line + text.matches('\n').count(),
            text.len() - last_newline - 1,
        ),
        None => Position::new(start.line, start.column + text.len()),
    }
}
