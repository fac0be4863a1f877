// Chunk: docs/chunks/line_buffer - Line-oriented character storage

//! LineBuffer is the single source of truth for document content.
//!
//! Content is stored as a vector of lines, each a vector of `char`s, so that
//! (row, col) coordinates index directly into storage. The buffer always
//! holds at least one (possibly empty) line.
//!
//! The six raw mutations below are the only way other components change
//! content. Each returns `DirtyLines` describing what needs to be redrawn.

use crate::types::{DirtyLines, Position};

/// An ordered, never-empty sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Vec<char>>,
}

impl LineBuffer {
    /// Creates a buffer holding a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
        }
    }

    /// Creates a buffer from text, splitting on `\n` only.
    ///
    /// A `\r` before a newline stays part of its line, so joining the lines
    /// back with `\n` reproduces the input byte for byte.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(|l| l.chars().collect()).collect(),
        }
    }

    /// Creates a buffer from already-split lines. An empty iterator yields
    /// one empty line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: Vec<Vec<char>> = lines
            .into_iter()
            .map(|l| l.as_ref().chars().collect())
            .collect();
        if lines.is_empty() {
            lines.push(Vec::new());
        }
        Self { lines }
    }

    // ==================== Accessors ====================

    /// Returns the number of lines. Always at least 1.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the characters of a line, or an empty slice when out of range.
    pub fn line(&self, row: usize) -> &[char] {
        self.lines.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns a line as an owned `String`.
    pub fn line_string(&self, row: usize) -> String {
        self.line(row).iter().collect()
    }

    /// Returns the length of a line in characters.
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, Vec::len)
    }

    /// Returns the character at (row, col), if any.
    pub fn char_at(&self, row: usize, col: usize) -> Option<char> {
        self.lines.get(row).and_then(|l| l.get(col)).copied()
    }

    /// Returns all lines.
    pub fn lines(&self) -> &[Vec<char>] {
        &self.lines
    }

    /// Returns the total character count, counting one per line break.
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum::<usize>() + self.lines.len() - 1
    }

    /// Returns true if the buffer holds a single empty line.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Returns the full content joined with `\n`.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.char_count());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(line.iter());
        }
        out
    }

    /// Returns the text in `[start, end)` (row-major), with `\n` for line breaks.
    pub fn text_range(&self, start: Position, end: Position) -> String {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let start = self.clamp(start);
        let end = self.clamp(end);
        let mut out = String::new();
        for row in start.line..=end.line {
            let line = self.line(row);
            let from = if row == start.line { start.col } else { 0 };
            let to = if row == end.line { end.col } else { line.len() };
            out.extend(line[from..to].iter());
            if row != end.line {
                out.push('\n');
            }
        }
        out
    }

    /// Clamps a position to the current buffer shape.
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        let col = pos.col.min(self.lines[line].len());
        Position::new(line, col)
    }

    /// Returns the position just past the last character.
    pub fn end_position(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, self.lines[last].len())
    }

    /// Returns the number of leading whitespace characters of a line.
    pub fn indent_len(&self, row: usize) -> usize {
        self.line(row)
            .iter()
            .take_while(|c| **c == ' ' || **c == '\t')
            .count()
    }

    // ==================== Mutations ====================

    /// Inserts `ch` at (row, col). The column is clamped to the line length.
    ///
    /// `ch` must not be a newline; line breaks go through `split_line`.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) -> DirtyLines {
        debug_assert!(ch != '\n', "newlines are inserted with split_line");
        let Some(line) = self.lines.get_mut(row) else {
            return DirtyLines::None;
        };
        let col = col.min(line.len());
        line.insert(col, ch);
        DirtyLines::Single(row)
    }

    /// Removes and returns the character at (row, col).
    pub fn remove_char(&mut self, row: usize, col: usize) -> Option<char> {
        let line = self.lines.get_mut(row)?;
        if col >= line.len() {
            return None;
        }
        Some(line.remove(col))
    }

    /// Splits line `row` at `col`; the tail becomes line `row + 1`.
    pub fn split_line(&mut self, row: usize, col: usize) -> DirtyLines {
        let Some(line) = self.lines.get_mut(row) else {
            return DirtyLines::None;
        };
        let col = col.min(line.len());
        let tail = line.split_off(col);
        self.lines.insert(row + 1, tail);
        DirtyLines::FromLineToEnd(row)
    }

    /// Appends line `row` to line `row - 1` and removes it.
    ///
    /// Returns the join column (the previous line's old length), or `None`
    /// when `row` is 0 or out of range.
    pub fn join_line(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.lines.len() {
            return None;
        }
        let tail = self.lines.remove(row);
        let prev = &mut self.lines[row - 1];
        let col = prev.len();
        prev.extend(tail);
        Some(col)
    }

    /// Inserts a whole line before `row` (or appends when `row == line_count`).
    pub fn insert_line(&mut self, row: usize, content: &str) -> DirtyLines {
        let row = row.min(self.lines.len());
        self.lines.insert(row, content.chars().collect());
        DirtyLines::FromLineToEnd(row)
    }

    /// Removes line `row` and returns its content.
    ///
    /// Removing the only line leaves a single empty line behind.
    pub fn remove_line(&mut self, row: usize) -> Option<String> {
        if row >= self.lines.len() {
            return None;
        }
        let removed: String = if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[0]).into_iter().collect()
        } else {
            self.lines.remove(row).into_iter().collect()
        };
        Some(removed)
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(buf: &LineBuffer) -> Vec<String> {
        (0..buf.line_count()).map(|r| buf.line_string(r)).collect()
    }

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buf = LineBuffer::new();
        assert_eq!(buf.line_count(), 1);
        assert!(buf.is_empty());
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn test_from_text_keeps_trailing_empty_line() {
        let buf = LineBuffer::from_text("a\nb\n");
        assert_eq!(lines(&buf), vec!["a", "b", ""]);
        assert_eq!(buf.text(), "a\nb\n");
    }

    #[test]
    fn test_from_text_keeps_carriage_returns() {
        let buf = LineBuffer::from_text("a\r\nb");
        assert_eq!(buf.line_len(0), 2);
        assert_eq!(buf.text(), "a\r\nb");
    }

    #[test]
    fn test_from_lines_empty_iterator() {
        let buf = LineBuffer::from_lines(Vec::<String>::new());
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_insert_and_remove_char() {
        let mut buf = LineBuffer::from_text("hllo");
        assert_eq!(buf.insert_char(0, 1, 'e'), DirtyLines::Single(0));
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.remove_char(0, 4), Some('o'));
        assert_eq!(buf.remove_char(0, 4), None);
        assert_eq!(buf.text(), "hell");
    }

    #[test]
    fn test_insert_char_multibyte() {
        let mut buf = LineBuffer::from_text("ab");
        buf.insert_char(0, 1, '\u{1F600}');
        assert_eq!(buf.line_len(0), 3);
        assert_eq!(buf.char_at(0, 1), Some('\u{1F600}'));
    }

    #[test]
    fn test_split_and_join() {
        let mut buf = LineBuffer::from_text("helloworld");
        assert_eq!(buf.split_line(0, 5), DirtyLines::FromLineToEnd(0));
        assert_eq!(lines(&buf), vec!["hello", "world"]);
        assert_eq!(buf.join_line(1), Some(5));
        assert_eq!(lines(&buf), vec!["helloworld"]);
        assert_eq!(buf.join_line(0), None);
    }

    #[test]
    fn test_split_at_line_end_creates_empty_line() {
        let mut buf = LineBuffer::from_text("abc");
        buf.split_line(0, 3);
        assert_eq!(lines(&buf), vec!["abc", ""]);
    }

    #[test]
    fn test_insert_and_remove_line() {
        let mut buf = LineBuffer::from_text("a\nc");
        buf.insert_line(1, "b");
        assert_eq!(lines(&buf), vec!["a", "b", "c"]);
        assert_eq!(buf.remove_line(0), Some("a".to_string()));
        assert_eq!(lines(&buf), vec!["b", "c"]);
        buf.insert_line(99, "d");
        assert_eq!(lines(&buf), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_remove_last_remaining_line_leaves_empty_line() {
        let mut buf = LineBuffer::from_text("only");
        assert_eq!(buf.remove_line(0), Some("only".to_string()));
        assert_eq!(buf.line_count(), 1);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_text_range_across_lines() {
        let buf = LineBuffer::from_text("hello\nworld\n!");
        let text = buf.text_range(Position::new(0, 3), Position::new(2, 0));
        assert_eq!(text, "lo\nworld\n");
        let reversed = buf.text_range(Position::new(2, 0), Position::new(0, 3));
        assert_eq!(reversed, text);
    }

    #[test]
    fn test_clamp() {
        let buf = LineBuffer::from_text("ab\nc");
        assert_eq!(buf.clamp(Position::new(7, 7)), Position::new(1, 1));
        assert_eq!(buf.clamp(Position::new(0, 9)), Position::new(0, 2));
    }

    #[test]
    fn test_indent_len() {
        let buf = LineBuffer::from_text("\t\t  x\nplain");
        assert_eq!(buf.indent_len(0), 4);
        assert_eq!(buf.indent_len(1), 0);
    }

    #[test]
    fn test_char_count_counts_newlines() {
        let buf = LineBuffer::from_text("ab\ncd");
        assert_eq!(buf.char_count(), 5);
    }
}
