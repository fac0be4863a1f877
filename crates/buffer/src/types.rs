// Chunk: docs/chunks/line_buffer - Buffer coordinates and dirty line reporting

/// Position in the buffer as (line, column) where both are 0-indexed.
///
/// The column counts Unicode scalar values, not bytes. Ordering is
/// row-major, which is what selection normalization relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Information about which lines were dirtied by a mutation.
/// Used by the redraw path to decide how much of the screen to repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyLines {
    /// No lines changed (e.g., cursor-only movement or no-op deletion).
    #[default]
    None,
    /// A single line changed (insertions, deletions within a line).
    Single(usize),
    /// A range of lines changed [from, to).
    Range { from: usize, to: usize },
    /// Everything from a line to the end of the buffer changed.
    /// Used whenever the row count changes (split, join, line insert/remove).
    FromLineToEnd(usize),
}

impl DirtyLines {
    /// Returns true if no lines were dirtied.
    pub fn is_none(&self) -> bool {
        matches!(self, DirtyLines::None)
    }

    /// Returns the starting line of the dirty region, if any.
    pub fn start_line(&self) -> Option<usize> {
        match *self {
            DirtyLines::None => None,
            DirtyLines::Single(line) => Some(line),
            DirtyLines::Range { from, .. } => Some(from),
            DirtyLines::FromLineToEnd(line) => Some(line),
        }
    }

    /// Returns the exclusive end of the dirty region, `None` meaning
    /// "to the end of the buffer".
    fn end_line(&self) -> Option<usize> {
        match *self {
            DirtyLines::None => Some(0),
            DirtyLines::Single(line) => Some(line + 1),
            DirtyLines::Range { to, .. } => Some(to),
            DirtyLines::FromLineToEnd(_) => None,
        }
    }

    /// Merges another dirty region into this one, producing the smallest
    /// region that covers both.
    ///
    /// A batch of primitive edits merges each primitive's report so the
    /// redraw covers the whole batch once.
    pub fn merge(&mut self, other: DirtyLines) {
        let (a, b) = match (self.start_line(), other.start_line()) {
            (None, _) => {
                *self = other;
                return;
            }
            (_, None) => return,
            (Some(a), Some(b)) => (a, b),
        };
        let from = a.min(b);
        *self = match (self.end_line(), other.end_line()) {
            (Some(x), Some(y)) => {
                let to = x.max(y);
                if to == from + 1 {
                    DirtyLines::Single(from)
                } else {
                    DirtyLines::Range { from, to }
                }
            }
            _ => DirtyLines::FromLineToEnd(from),
        };
    }

    /// Returns true if `line` falls inside the dirty region.
    pub fn contains(&self, line: usize) -> bool {
        match (self.start_line(), self.end_line()) {
            (None, _) => false,
            (Some(from), Some(to)) => line >= from && line < to,
            (Some(from), None) => line >= from,
        }
    }
}
