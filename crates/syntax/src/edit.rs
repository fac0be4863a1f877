// Chunk: docs/chunks/syntax_highlighting - Edit envelope translation for tree-sitter

//! Edit envelope translation between buffer coordinates and tree-sitter byte offsets.
//!
//! The buffer speaks (row, col) in characters. Tree-sitter wants byte offsets
//! plus points whose column is also a byte count. A [`TextChange`] is the
//! buffer-side description of one edit; [`EditEvent::from_change`] turns it
//! into the tree-sitter form by walking the old and new snapshots.

use quill_buffer::Position;

/// The region touched by an edit, in character coordinates.
///
/// `start..old_end` is the replaced range in the old text and
/// `start..new_end` the replacement in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    pub start: Position,
    pub old_end: Position,
    pub new_end: Position,
}

impl TextChange {
    /// Text was inserted at `at` and now ends at `end`.
    pub fn insertion(at: Position, end: Position) -> TextChange {
        TextChange {
            start: at,
            old_end: at,
            new_end: end,
        }
    }

    /// The text in `[start, end)` was removed.
    pub fn removal(start: Position, end: Position) -> TextChange {
        TextChange {
            start,
            old_end: end,
            new_end: start,
        }
    }

    /// Returns true if the change replaced nothing with nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.old_end && self.start == self.new_end
    }

    /// Chains `next`, made on the text this change produced, onto this
    /// change. The result turns the text before `self` into the text after
    /// `next`.
    pub fn then(self, next: TextChange) -> TextChange {
        let old_end = if next.old_end > self.new_end {
            shift(next.old_end, self.new_end, self.old_end)
        } else {
            self.old_end
        };
        TextChange {
            start: self.start.min(next.start),
            old_end,
            new_end: next.map_forward(self.new_end).max(next.new_end),
        }
    }

    /// Maps a position in the text before this change to the text after
    /// it. Positions inside the replaced range land on `new_end`.
    pub fn map_forward(&self, pos: Position) -> Position {
        if pos <= self.start {
            pos
        } else if pos < self.old_end {
            self.new_end
        } else {
            shift(pos, self.old_end, self.new_end)
        }
    }
}

/// Moves `pos`, at or after `from`, by the distance from `from` to `to`.
fn shift(pos: Position, from: Position, to: Position) -> Position {
    if pos.line == from.line {
        Position::new(to.line, to.col + (pos.col - from.col))
    } else {
        Position::new(to.line + (pos.line - from.line), pos.col)
    }
}

/// An edit event in tree-sitter format.
///
/// Contains both byte offsets and (row, col) points needed by
/// `tree_sitter::InputEdit`. Point columns are byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditEvent {
    /// Byte offset where the edit starts
    pub start_byte: usize,
    /// Byte offset where the old content ends
    pub old_end_byte: usize,
    /// Byte offset where the new content ends
    pub new_end_byte: usize,
    pub start_row: usize,
    pub start_col: usize,
    pub old_end_row: usize,
    pub old_end_col: usize,
    pub new_end_row: usize,
    pub new_end_col: usize,
}

impl EditEvent {
    /// Translates a character-coordinate change against the snapshots taken
    /// before (`old`) and after (`new`) the edit.
    pub fn from_change(old: &str, new: &str, change: &TextChange) -> Self {
        let start_byte = position_to_byte_offset(old, change.start.line, change.start.col);
        let old_end_byte = position_to_byte_offset(old, change.old_end.line, change.old_end.col);
        let new_end_byte = position_to_byte_offset(new, change.new_end.line, change.new_end.col);

        let (start_row, start_col) = byte_point(old, start_byte);
        let (old_end_row, old_end_col) = byte_point(old, old_end_byte);
        let (new_end_row, new_end_col) = byte_point(new, new_end_byte);

        Self {
            start_byte,
            old_end_byte: old_end_byte.max(start_byte),
            new_end_byte: new_end_byte.max(start_byte),
            start_row,
            start_col,
            old_end_row,
            old_end_col,
            new_end_row,
            new_end_col,
        }
    }

    /// Converts this edit event to a tree-sitter `InputEdit`.
    pub fn to_input_edit(&self) -> tree_sitter::InputEdit {
        tree_sitter::InputEdit {
            start_byte: self.start_byte,
            old_end_byte: self.old_end_byte,
            new_end_byte: self.new_end_byte,
            start_position: tree_sitter::Point {
                row: self.start_row,
                column: self.start_col,
            },
            old_end_position: tree_sitter::Point {
                row: self.old_end_row,
                column: self.old_end_col,
            },
            new_end_position: tree_sitter::Point {
                row: self.new_end_row,
                column: self.new_end_col,
            },
        }
    }
}

/// Calculates the byte offset for a (row, col) position in a source string.
///
/// Positions are 0-indexed. Column is in characters, not bytes.
/// A column past the end of its line clamps to the line end; a row past the
/// end of the source returns the source length.
///
/// # Example
///
/// ```
/// use quill_syntax::position_to_byte_offset;
///
/// let source = "hello\nworld";
/// assert_eq!(position_to_byte_offset(source, 0, 0), 0);
/// assert_eq!(position_to_byte_offset(source, 0, 5), 5);
/// assert_eq!(position_to_byte_offset(source, 1, 0), 6); // after newline
/// assert_eq!(position_to_byte_offset(source, 1, 5), 11);
/// ```
pub fn position_to_byte_offset(source: &str, row: usize, col: usize) -> usize {
    let mut line_start = 0;
    for _ in 0..row {
        match source[line_start..].find('\n') {
            Some(nl) => line_start += nl + 1,
            None => return source.len(),
        }
    }

    for (char_col, (idx, c)) in source[line_start..].char_indices().enumerate() {
        if c == '\n' || char_col >= col {
            return line_start + idx;
        }
    }
    source.len()
}

/// Calculates the (row, col) position for a byte offset in a source string.
///
/// Column is in characters, not bytes. Offsets past the end map to the end
/// position.
///
/// # Example
///
/// ```
/// use quill_buffer::Position;
/// use quill_syntax::byte_offset_to_position;
///
/// let source = "hello\nworld";
/// assert_eq!(byte_offset_to_position(source, 5), Position::new(0, 5));
/// assert_eq!(byte_offset_to_position(source, 6), Position::new(1, 0));
/// ```
pub fn byte_offset_to_position(source: &str, byte_offset: usize) -> Position {
    let mut row = 0;
    let mut col = 0;
    let mut current_byte = 0;

    for ch in source.chars() {
        if current_byte >= byte_offset {
            break;
        }
        if ch == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
        current_byte += ch.len_utf8();
    }

    Position::new(row, col)
}

/// Returns the tree-sitter point (row, byte column) of a byte offset.
fn byte_point(source: &str, byte: usize) -> (usize, usize) {
    let byte = byte.min(source.len());
    let before = &source.as_bytes()[..byte];
    let row = before.iter().filter(|b| **b == b'\n').count();
    let line_start = before.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
    (row, byte - line_start)
}
