// Chunk: docs/chunks/undo_redo - Invertible primitive operations grouped into batches

//! Operation log backing undo and redo.
//!
//! Every content change is expressed as a sequence of primitive
//! [`Operation`]s. Each primitive has an exact inverse, so a batch is undone
//! by replaying the inverses of its operations in reverse order and redone
//! by replaying the operations themselves forward.
//!
//! A batch moves through four states: recording (between `begin` and
//! `commit`), committed (on the undo stack), undone (on the redo stack) and
//! redone (back on the undo stack). Recording a new batch clears the redo
//! stack.

use std::collections::VecDeque;

use quill_buffer::{LineBuffer, Position};
use quill_syntax::{ColorGrid, TextChange};

/// A primitive, invertible edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `ch` was inserted at (row, col).
    Insert { row: usize, col: usize, ch: char },
    /// `ch` was removed from (row, col).
    Delete { row: usize, col: usize, ch: char },
    /// Line `row` was split at `col`.
    Enter { row: usize, col: usize },
    /// Line `row + 1` was appended to line `row`, whose length was `col`.
    DeleteLine { row: usize, col: usize },
    /// The cursor was placed explicitly.
    MoveCursor { from: Position, to: Position },
}

impl Operation {
    /// Returns the operation that undoes this one.
    pub fn invert(self) -> Operation {
        match self {
            Operation::Insert { row, col, ch } => Operation::Delete { row, col, ch },
            Operation::Delete { row, col, ch } => Operation::Insert { row, col, ch },
            Operation::Enter { row, col } => Operation::DeleteLine { row, col },
            Operation::DeleteLine { row, col } => Operation::Enter { row, col },
            Operation::MoveCursor { from, to } => Operation::MoveCursor { from: to, to: from },
        }
    }

    /// Returns true if the operation changes content.
    pub fn is_content(&self) -> bool {
        !matches!(self, Operation::MoveCursor { .. })
    }

    /// The region this operation changed, in the coordinates of the text it
    /// was applied to. `None` for cursor moves.
    pub fn change(&self) -> Option<TextChange> {
        let change = match *self {
            Operation::Insert { row, col, .. } => {
                TextChange::insertion(Position::new(row, col), Position::new(row, col + 1))
            }
            Operation::Delete { row, col, .. } => {
                TextChange::removal(Position::new(row, col), Position::new(row, col + 1))
            }
            Operation::Enter { row, col } => {
                TextChange::insertion(Position::new(row, col), Position::new(row + 1, 0))
            }
            Operation::DeleteLine { row, col } => {
                TextChange::removal(Position::new(row, col), Position::new(row + 1, 0))
            }
            Operation::MoveCursor { .. } => return None,
        };
        Some(change)
    }

    /// Applies the operation to the buffer and splices the color grid the
    /// same way.
    ///
    /// Returns the operation as actually applied (columns clamped, the
    /// removed character filled in), or `None` if nothing changed. Recording
    /// the returned value keeps `invert` exact even for out-of-range input.
    pub fn apply(self, buffer: &mut LineBuffer, grid: &mut ColorGrid) -> Option<Operation> {
        match self {
            Operation::Insert { row, col, ch } => {
                if row >= buffer.line_count() || ch == '\n' {
                    return None;
                }
                let col = col.min(buffer.line_len(row));
                buffer.insert_char(row, col, ch);
                grid.insert_cell(row, col);
                Some(Operation::Insert { row, col, ch })
            }
            Operation::Delete { row, col, ch } => {
                let removed = buffer.remove_char(row, col)?;
                debug_assert_eq!(removed, ch, "deleted character does not match the log");
                grid.remove_cell(row, col);
                Some(Operation::Delete { row, col, ch: removed })
            }
            Operation::Enter { row, col } => {
                if row >= buffer.line_count() {
                    return None;
                }
                let col = col.min(buffer.line_len(row));
                buffer.split_line(row, col);
                grid.split_row(row, col);
                Some(Operation::Enter { row, col })
            }
            Operation::DeleteLine { row, .. } => {
                let col = buffer.join_line(row + 1)?;
                grid.join_row(row + 1);
                Some(Operation::DeleteLine { row, col })
            }
            Operation::MoveCursor { from, to } => (from != to).then_some(self),
        }
    }

    /// Maps a position through this operation so that marks (the cursor,
    /// selection endpoints) stay attached to the same text.
    pub fn transform(&self, pos: Position) -> Position {
        let Position { line, col } = pos;
        match *self {
            Operation::Insert { row, col: at, .. } => {
                if line == row && col >= at {
                    Position::new(line, col + 1)
                } else {
                    pos
                }
            }
            Operation::Delete { row, col: at, .. } => {
                if line == row && col > at {
                    Position::new(line, col - 1)
                } else {
                    pos
                }
            }
            Operation::Enter { row, col: at } => {
                if line == row && col >= at {
                    Position::new(line + 1, col - at)
                } else if line > row {
                    Position::new(line + 1, col)
                } else {
                    pos
                }
            }
            Operation::DeleteLine { row, col: at } => {
                if line == row + 1 {
                    Position::new(row, at + col)
                } else if line > row + 1 {
                    Position::new(line - 1, col)
                } else {
                    pos
                }
            }
            Operation::MoveCursor { .. } => pos,
        }
    }
}

/// One atomic, undoable user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBatch {
    pub ops: Vec<Operation>,
    pub cursor_before: Position,
    pub cursor_after: Position,
}

impl EditBatch {
    fn new(cursor: Position) -> Self {
        Self {
            ops: Vec::new(),
            cursor_before: cursor,
            cursor_after: cursor,
        }
    }

    fn has_content(&self) -> bool {
        self.ops.iter().any(Operation::is_content)
    }
}

/// Undo and redo stacks plus the batch currently being recorded.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<EditBatch>,
    redo: Vec<EditBatch>,
    pending: Option<EditBatch>,
    /// Nesting depth of `begin` calls; the batch closes at depth 0.
    depth: usize,
    limit: usize,
}

impl History {
    /// Creates an empty history keeping at most `limit` undo batches.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            pending: None,
            depth: 0,
            limit: limit.max(1),
        }
    }

    /// Starts recording a batch. Nested calls join the outer batch.
    pub fn begin(&mut self, cursor: Position) {
        if self.depth == 0 {
            self.pending = Some(EditBatch::new(cursor));
        }
        self.depth += 1;
    }

    /// Returns true while a batch is being recorded.
    pub fn is_recording(&self) -> bool {
        self.pending.is_some()
    }

    /// Appends an operation to the open batch. Ignored outside a batch.
    pub fn record(&mut self, op: Operation) {
        if let Some(batch) = self.pending.as_mut() {
            batch.ops.push(op);
        }
    }

    /// Closes one level of recording. At the outermost level the batch is
    /// pushed onto the undo stack and the redo stack is cleared.
    ///
    /// Returns true only when a batch that changed content was pushed.
    /// Batches with no content change are dropped.
    pub fn commit(&mut self, cursor: Position) -> bool {
        if self.depth == 0 {
            return false;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return false;
        }
        let Some(mut batch) = self.pending.take() else {
            return false;
        };
        if !batch.has_content() {
            return false;
        }
        batch.cursor_after = cursor;
        self.redo.clear();
        self.undo.push_back(batch);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        true
    }

    /// Moves the newest batch to the redo stack and returns a copy to
    /// replay backwards. `None` when there is nothing to undo.
    ///
    /// `cursor` is where the cursor is now; a later redo returns it there.
    pub fn undo(&mut self, cursor: Position) -> Option<EditBatch> {
        let mut batch = self.undo.pop_back()?;
        batch.cursor_after = cursor;
        self.redo.push(batch.clone());
        Some(batch)
    }

    /// Moves the newest undone batch back to the undo stack and returns a
    /// copy to replay forwards.
    pub fn redo(&mut self, cursor: Position) -> Option<EditBatch> {
        let mut batch = self.redo.pop()?;
        batch.cursor_before = cursor;
        self.undo.push_back(batch.clone());
        Some(batch)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}
