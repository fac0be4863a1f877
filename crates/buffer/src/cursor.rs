// Chunk: docs/chunks/cursor_navigation - Cursor motions and scroll offsets

//! Cursor position, motions and scroll offsets.
//!
//! Navigation never mutates content. Every motion recomputes the position
//! against the current buffer shape, so a cursor that was left stale by a
//! structural edit is re-validated on its next use (see [`Cursor::clamp`]).

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::line_buffer::LineBuffer;
use crate::types::Position;

/// A cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    /// First non-blank character, or column 0 when already there.
    Home,
    End,
    BufferStart,
    BufferEnd,
    PageUp,
    PageDown,
}

/// The editing cursor plus the viewport's scroll offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    /// Column remembered across vertical moves through shorter lines.
    preferred_col: Option<usize>,
    /// First visible row.
    pub scroll_row: usize,
    /// First visible display column.
    pub scroll_col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current position.
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn row(&self) -> usize {
        self.pos.line
    }

    pub fn col(&self) -> usize {
        self.pos.col
    }

    /// Places the cursor, clamped to the buffer. Resets the sticky column.
    pub fn set(&mut self, pos: Position, buffer: &LineBuffer) {
        self.pos = buffer.clamp(pos);
        self.preferred_col = None;
    }

    /// Re-validates the position after a structural edit.
    pub fn clamp(&mut self, buffer: &LineBuffer) {
        self.pos = buffer.clamp(self.pos);
    }

    /// Applies a motion. `page_rows` is the viewport height used by
    /// PageUp/PageDown.
    pub fn apply(&mut self, motion: Motion, buffer: &LineBuffer, page_rows: usize) {
        self.clamp(buffer);
        let Position { line, col } = self.pos;
        match motion {
            Motion::Left => {
                if col > 0 {
                    self.pos.col -= 1;
                } else if line > 0 {
                    self.pos = Position::new(line - 1, buffer.line_len(line - 1));
                }
            }
            Motion::Right => {
                if col < buffer.line_len(line) {
                    self.pos.col += 1;
                } else if line + 1 < buffer.line_count() {
                    self.pos = Position::new(line + 1, 0);
                }
            }
            Motion::Up => return self.vertical(line.checked_sub(1), buffer),
            Motion::Down => {
                let target = (line + 1 < buffer.line_count()).then_some(line + 1);
                return self.vertical(target, buffer);
            }
            Motion::PageUp => {
                let target = line.saturating_sub(page_rows.max(1));
                return self.vertical(Some(target), buffer);
            }
            Motion::PageDown => {
                let target = (line + page_rows.max(1)).min(buffer.line_count() - 1);
                return self.vertical(Some(target), buffer);
            }
            Motion::WordLeft => {
                self.pos = if col == 0 {
                    match line.checked_sub(1) {
                        Some(prev) => Position::new(prev, buffer.line_len(prev)),
                        None => self.pos,
                    }
                } else {
                    Position::new(line, word_start_before(buffer.line(line), col))
                };
            }
            Motion::WordRight => {
                let len = buffer.line_len(line);
                self.pos = if col >= len {
                    if line + 1 < buffer.line_count() {
                        Position::new(line + 1, 0)
                    } else {
                        self.pos
                    }
                } else {
                    Position::new(line, word_end_after(buffer.line(line), col))
                };
            }
            Motion::Home => {
                let indent = buffer.indent_len(line);
                self.pos.col = if col == indent { 0 } else { indent };
            }
            Motion::End => self.pos.col = buffer.line_len(line),
            Motion::BufferStart => self.pos = Position::new(0, 0),
            Motion::BufferEnd => self.pos = buffer.end_position(),
        }
        self.preferred_col = None;
    }

    fn vertical(&mut self, target: Option<usize>, buffer: &LineBuffer) {
        let Some(target) = target else {
            return;
        };
        let want = *self.preferred_col.get_or_insert(self.pos.col);
        self.pos = Position::new(target, want.min(buffer.line_len(target)));
    }

    /// Adjusts the scroll offsets so the cursor is inside a viewport of
    /// `rows` x `cols` display cells.
    pub fn scroll_into_view(&mut self, buffer: &LineBuffer, rows: usize, cols: usize, tab_width: usize) {
        let rows = rows.max(1);
        let cols = cols.max(1);
        if self.pos.line < self.scroll_row {
            self.scroll_row = self.pos.line;
        } else if self.pos.line >= self.scroll_row + rows {
            self.scroll_row = self.pos.line + 1 - rows;
        }

        let x = display_col(buffer.line(self.pos.line), self.pos.col, tab_width);
        if x < self.scroll_col {
            self.scroll_col = x;
        } else if x >= self.scroll_col + cols {
            self.scroll_col = x + 1 - cols;
        }
    }
}

/// Returns the display column of character `col` in `line`, expanding tabs
/// to the next multiple of `tab_width` and counting wide characters twice.
pub fn display_col(line: &[char], col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    line.iter().take(col).fold(0, |x, ch| {
        if *ch == '\t' {
            x + tab_width - (x % tab_width)
        } else {
            x + ch.width().unwrap_or(0)
        }
    })
}

/// Returns (start, end) char columns of each word segment in a line.
fn word_spans(line: &[char]) -> Vec<(usize, usize)> {
    let text: String = line.iter().collect();
    let mut spans = Vec::new();
    let mut col = 0;
    for segment in text.split_word_bounds() {
        let len = segment.chars().count();
        if segment.chars().any(|c| c.is_alphanumeric() || c == '_') {
            spans.push((col, col + len));
        }
        col += len;
    }
    spans
}

fn word_start_before(line: &[char], col: usize) -> usize {
    word_spans(line)
        .into_iter()
        .rev()
        .find(|(start, _)| *start < col)
        .map_or(0, |(start, _)| start)
}

fn word_end_after(line: &[char], col: usize) -> usize {
    word_spans(line)
        .into_iter()
        .find(|(_, end)| *end > col)
        .map_or(line.len(), |(_, end)| end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(buffer: &LineBuffer, line: usize, col: usize) -> Cursor {
        let mut c = Cursor::new();
        c.set(Position::new(line, col), buffer);
        c
    }

    #[test]
    fn test_left_wraps_to_previous_line_end() {
        let buf = LineBuffer::from_text("abc\nde");
        let mut c = at(&buf, 1, 0);
        c.apply(Motion::Left, &buf, 10);
        assert_eq!(c.position(), Position::new(0, 3));
    }

    #[test]
    fn test_right_wraps_to_next_line_start() {
        let buf = LineBuffer::from_text("abc\nde");
        let mut c = at(&buf, 0, 3);
        c.apply(Motion::Right, &buf, 10);
        assert_eq!(c.position(), Position::new(1, 0));
        c.apply(Motion::End, &buf, 10);
        c.apply(Motion::Right, &buf, 10);
        assert_eq!(c.position(), Position::new(1, 2));
    }

    #[test]
    fn test_vertical_motion_keeps_preferred_column() {
        let buf = LineBuffer::from_text("long line\nab\nanother long");
        let mut c = at(&buf, 0, 7);
        c.apply(Motion::Down, &buf, 10);
        assert_eq!(c.position(), Position::new(1, 2));
        c.apply(Motion::Down, &buf, 10);
        assert_eq!(c.position(), Position::new(2, 7));
    }

    #[test]
    fn test_up_at_first_line_is_noop() {
        let buf = LineBuffer::from_text("abc");
        let mut c = at(&buf, 0, 2);
        c.apply(Motion::Up, &buf, 10);
        assert_eq!(c.position(), Position::new(0, 2));
    }

    #[test]
    fn test_word_jumps() {
        let buf = LineBuffer::from_text("let foo_bar = baz;");
        let mut c = at(&buf, 0, 0);
        c.apply(Motion::WordRight, &buf, 10);
        assert_eq!(c.col(), 3);
        c.apply(Motion::WordRight, &buf, 10);
        assert_eq!(c.col(), 11);
        c.apply(Motion::WordRight, &buf, 10);
        assert_eq!(c.col(), 17);
        c.apply(Motion::WordLeft, &buf, 10);
        assert_eq!(c.col(), 14);
        c.apply(Motion::WordLeft, &buf, 10);
        assert_eq!(c.col(), 4);
    }

    #[test]
    fn test_smart_home_toggles() {
        let buf = LineBuffer::from_text("    code");
        let mut c = at(&buf, 0, 6);
        c.apply(Motion::Home, &buf, 10);
        assert_eq!(c.col(), 4);
        c.apply(Motion::Home, &buf, 10);
        assert_eq!(c.col(), 0);
    }

    #[test]
    fn test_page_down_clamps_to_last_line() {
        let buf = LineBuffer::from_text("a\nb\nc\nd");
        let mut c = at(&buf, 1, 0);
        c.apply(Motion::PageDown, &buf, 10);
        assert_eq!(c.row(), 3);
        c.apply(Motion::PageUp, &buf, 2);
        assert_eq!(c.row(), 1);
    }

    #[test]
    fn test_clamp_after_structural_edit() {
        let mut buf = LineBuffer::from_text("abc\ndef");
        let mut c = at(&buf, 1, 3);
        buf.remove_line(1);
        c.clamp(&buf);
        assert_eq!(c.position(), Position::new(0, 3));
    }

    #[test]
    fn test_display_col_expands_tabs_and_wide_chars() {
        let line: Vec<char> = "\tab\u{4E2D}x".chars().collect();
        assert_eq!(display_col(&line, 1, 4), 4);
        assert_eq!(display_col(&line, 3, 4), 6);
        assert_eq!(display_col(&line, 4, 4), 8);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let text = (0..50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let buf = LineBuffer::from_text(&text);
        let mut c = at(&buf, 30, 0);
        c.scroll_into_view(&buf, 10, 80, 4);
        assert_eq!(c.scroll_row, 21);
        c.set(Position::new(5, 0), &buf);
        c.scroll_into_view(&buf, 10, 80, 4);
        assert_eq!(c.scroll_row, 5);
    }

    #[test]
    fn test_horizontal_scroll() {
        let buf = LineBuffer::from_text(&"x".repeat(100));
        let mut c = at(&buf, 0, 90);
        c.scroll_into_view(&buf, 10, 40, 4);
        assert_eq!(c.scroll_col, 51);
    }
}
