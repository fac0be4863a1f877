// Chunk: docs/chunks/diagnostics - Read-only range annotations

use quill_buffer::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// A range annotation pushed by an external checker. The editor stores and
/// reports these; it never edits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub start: Position,
    pub end: Position,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Returns true if the diagnostic touches `row`.
    pub fn covers_row(&self, row: usize) -> bool {
        let (lo, hi) = if self.end < self.start {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };
        row >= lo.line && row <= hi.line
    }
}
