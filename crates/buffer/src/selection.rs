// Chunk: docs/chunks/text_selection_model - Two-point selection with normalized queries

//! Selection model.
//!
//! A selection stores its two endpoints in input order: `start` is where the
//! drag or extension began, `end` follows the cursor. Dragging backwards
//! leaves the points inverted. Every query normalizes first, so results do
//! not depend on drag direction.
//!
//! Coordinates are `(x, y)` = (column, row). A position with `x` equal to the
//! line length stands for that line's newline, so a selection that crosses a
//! line end selects the line break too.

use crate::line_buffer::LineBuffer;
use crate::types::Position;

/// A single contiguous selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start_x: usize,
    pub start_y: usize,
    pub end_x: usize,
    pub end_y: usize,
    pub active: bool,
}

impl Selection {
    /// Creates an inactive selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a selection anchored at (x, y). Both points coincide, so it
    /// selects nothing until extended.
    pub fn begin_at(&mut self, x: usize, y: usize) {
        *self = Self {
            start_x: x,
            start_y: y,
            end_x: x,
            end_y: y,
            active: true,
        };
    }

    /// Moves the free endpoint to (x, y), starting a selection there if none
    /// is active.
    pub fn extend_to(&mut self, x: usize, y: usize) {
        if !self.active {
            self.begin_at(x, y);
        }
        self.end_x = x;
        self.end_y = y;
    }

    /// Deactivates the selection.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Selects the whole buffer.
    pub fn select_all(&mut self, buffer: &LineBuffer) {
        let end = buffer.end_position();
        self.begin_at(0, 0);
        self.extend_to(end.col, end.line);
    }

    /// Returns the anchor point as a `Position`.
    pub fn anchor(&self) -> Position {
        Position::new(self.start_y, self.start_x)
    }

    /// Returns the free point as a `Position`.
    pub fn head(&self) -> Position {
        Position::new(self.end_y, self.end_x)
    }

    /// Returns true when nothing is selected: inactive, or both points equal.
    pub fn is_empty(&self) -> bool {
        !self.active || (self.start_x == self.end_x && self.start_y == self.end_y)
    }

    /// Returns true when the selection is active and non-empty.
    pub fn has_selection(&self) -> bool {
        !self.is_empty()
    }

    /// Returns the endpoints in row-major ascending order.
    pub fn normalized(&self) -> (Position, Position) {
        let a = self.anchor();
        let b = self.head();
        if b < a {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Returns the normalized range, or `None` when nothing is selected.
    pub fn range(&self) -> Option<(Position, Position)> {
        self.has_selection().then(|| self.normalized())
    }

    /// Returns true iff (x, y) is at or after the normalized start and
    /// strictly before the normalized end.
    pub fn is_under_selection(&self, x: usize, y: usize) -> bool {
        if self.is_empty() {
            return false;
        }
        let (start, end) = self.normalized();
        let p = Position::new(y, x);
        p >= start && p < end
    }

    /// Returns the rows that contain at least one selected position.
    pub fn selected_lines(&self, buffer: &LineBuffer) -> Vec<usize> {
        let mut rows = Vec::new();
        self.scan(buffer, |_, y| {
            if rows.last() != Some(&y) {
                rows.push(y);
            }
        });
        rows
    }

    /// Returns every selected (x, y), including newline slots (`x == len`).
    pub fn selected_indices(&self, buffer: &LineBuffer) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        self.scan(buffer, |x, y| out.push((x, y)));
        out
    }

    /// Returns the selected text, with `\n` for each selected line end.
    pub fn selection_text(&self, buffer: &LineBuffer) -> String {
        let mut out = String::new();
        self.scan(buffer, |x, y| match buffer.char_at(y, x) {
            Some(ch) => out.push(ch),
            None => out.push('\n'),
        });
        out
    }

    /// Keeps both endpoints inside the buffer after a structural edit.
    pub fn clamp(&mut self, buffer: &LineBuffer) {
        if !self.active {
            return;
        }
        let a = buffer.clamp(self.anchor());
        let b = buffer.clamp(self.head());
        self.start_x = a.col;
        self.start_y = a.line;
        self.end_x = b.col;
        self.end_y = b.line;
    }

    /// Visits selected positions in row-major order, starting at the
    /// normalized start row and stopping as soon as the walk leaves the
    /// selected run. The newline slot after the last line is never visited.
    fn scan(&self, buffer: &LineBuffer, mut visit: impl FnMut(usize, usize)) {
        if self.is_empty() {
            return;
        }
        let (start, _) = self.normalized();
        let last_row = buffer.line_count() - 1;
        let mut inside = false;
        for y in start.line..=last_row {
            let slots = if y == last_row {
                buffer.line_len(y)
            } else {
                buffer.line_len(y) + 1
            };
            for x in 0..slots {
                if self.is_under_selection(x, y) {
                    inside = true;
                    visit(x, y);
                } else if inside {
                    return;
                }
            }
        }
    }
}
