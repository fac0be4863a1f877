// Chunk: docs/chunks/editable_buffer - Document with edit operations
// Chunk: docs/chunks/undo_redo - Batches recorded around every edit operation

//! A `Document` is one open file: its lines, cursor, selection, undo
//! history and color grid, kept consistent with each other.
//!
//! # Edit protocol
//!
//! Every public edit operation runs inside [`Document::transact`], which
//! opens a history batch, lets the operation issue primitive
//! [`Operation`]s, and on commit hands the new text and the batch's changed
//! region to the highlight engine once. Primitives go through a single path
//! (`apply`) that
//!
//! 1. mutates the buffer and splices the color grid identically,
//! 2. maps the cursor and selection through the change,
//! 3. grows the batch's changed region, and
//! 4. records the operation as applied.
//!
//! So the grid has the buffer's shape after every primitive, and the batch
//! on the undo stack is exactly what happened. An operation that ends up
//! changing nothing pushes no batch and does not bump the version.
//!
//! Undo and redo replay a batch without recording and then recolor from
//! scratch, because a batch can touch arbitrary places in the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use quill_buffer::{Cursor, DirtyLines, LineBuffer, Motion, Position, Selection, Style};
use quill_syntax::{
    ColorGrid, ColorId, ColorizeJob, ColorizeResult, CommentStyle, HighlightEngine, Language,
    SyntaxTheme, TextChange,
};

use crate::clipboard::Clipboard;
use crate::config::{EditorConfig, Indent};
use crate::core_event::DocId;
use crate::diagnostics::Diagnostic;
use crate::error::EditorError;
use crate::history::{History, Operation};
use crate::persist::{self, SaveSnapshot};

/// Viewport used until the front end reports its size.
const DEFAULT_VIEWPORT: (usize, usize) = (24, 80);

pub struct Document {
    buffer: LineBuffer,
    cursor: Cursor,
    selection: Selection,
    history: History,
    engine: HighlightEngine,
    path: Option<PathBuf>,
    indent: Indent,
    tab_width: usize,
    /// Visible (rows, cols).
    viewport: (usize, usize),
    version: u64,
    saved_version: u64,
    dirty_lines: DirtyLines,
    diagnostics: Vec<Diagnostic>,
    /// Full coloring pass still owed after a two-phase open.
    pending_job: Option<ColorizeJob>,
    /// Region changed by the batch being recorded, relative to the text
    /// before the batch.
    batch_change: Option<TextChange>,
}

impl Document {
    /// Creates an unsaved document with default settings.
    pub fn from_text(text: &str, language: Language) -> Self {
        Self::with_config(text, language, &EditorConfig::default(), Arc::new(SyntaxTheme::default()))
    }

    /// Creates an unsaved document.
    ///
    /// Large texts are colored in two phases; the job for the second phase
    /// is available from [`take_colorize_job`](Self::take_colorize_job).
    pub fn with_config(
        text: &str,
        language: Language,
        config: &EditorConfig,
        theme: Arc<SyntaxTheme>,
    ) -> Self {
        let mut engine = HighlightEngine::new(language, text, theme);
        let pending_job =
            engine.colorize_initial(text, config.large_file_lines, config.initial_color_lines);
        Self {
            buffer: LineBuffer::from_text(text),
            cursor: Cursor::new(),
            selection: Selection::new(),
            history: History::new(config.undo_limit),
            engine,
            path: None,
            indent: config.indent,
            tab_width: config.tab_width.max(1),
            viewport: DEFAULT_VIEWPORT,
            version: 0,
            saved_version: 0,
            dirty_lines: DirtyLines::FromLineToEnd(0),
            diagnostics: Vec::new(),
            pending_job,
            batch_change: None,
        }
    }

    /// Opens `path`, picking the language from its extension.
    pub fn open(path: &Path, config: &EditorConfig) -> Result<Self, EditorError> {
        Self::open_with_theme(path, config, Arc::new(SyntaxTheme::default()))
    }

    pub fn open_with_theme(
        path: &Path,
        config: &EditorConfig,
        theme: Arc<SyntaxTheme>,
    ) -> Result<Self, EditorError> {
        let text = persist::read_buffer(path)?.text();
        let language = Language::from_path(path);
        let mut doc = Self::with_config(&text, language, config, theme);
        doc.path = Some(path.to_path_buf());
        info!(
            "opened {} ({} lines, {})",
            path.display(),
            doc.buffer.line_count(),
            language.id()
        );
        Ok(doc)
    }

    // ==================== Accessors ====================

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn engine(&self) -> &HighlightEngine {
        &self.engine
    }

    pub fn grid(&self) -> &ColorGrid {
        self.engine.grid()
    }

    pub fn color_at(&self, row: usize, col: usize) -> ColorId {
        self.engine.color_at(row, col)
    }

    pub fn style_at(&self, row: usize, col: usize) -> Style {
        self.engine.style_at(row, col)
    }

    /// Full text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Language {
        self.engine.language()
    }

    /// Language identifier as used by language servers.
    pub fn language_id(&self) -> &'static str {
        self.language().id()
    }

    /// Cursor as (row, col).
    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor.row(), self.cursor.col())
    }

    /// Bumped by every content change, including undo and redo.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns true if the content changed since the last save.
    pub fn is_dirty(&self) -> bool {
        self.version != self.saved_version
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics = diagnostics;
        self.dirty_lines.merge(DirtyLines::FromLineToEnd(0));
    }

    /// Returns and resets the lines touched since the last call.
    pub fn take_dirty_lines(&mut self) -> DirtyLines {
        std::mem::take(&mut self.dirty_lines)
    }

    /// Sets the visible size used for scrolling and paging.
    pub fn set_viewport(&mut self, rows: usize, cols: usize) {
        self.viewport = (rows.max(1), cols.max(1));
        self.scroll_to_cursor();
    }

    // ==================== Background coloring ====================

    /// Takes the second-phase coloring job left by a two-phase open.
    pub fn take_colorize_job(&mut self) -> Option<ColorizeJob> {
        self.pending_job.take()
    }

    /// A fresh full coloring job for the current text.
    pub fn colorize_job(&self) -> Option<ColorizeJob> {
        self.engine.background_job()
    }

    /// Installs a background coloring result. Returns false if the result
    /// is stale and was dropped.
    pub fn install_colors(&mut self, result: ColorizeResult) -> bool {
        let installed = self.engine.install(result);
        if installed {
            self.dirty_lines.merge(DirtyLines::FromLineToEnd(0));
        }
        installed
    }

    // ==================== Persistence ====================

    /// Writes the document to its path.
    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.as_deref().ok_or(EditorError::NoPath)?;
        persist::write_text(path, &self.buffer.text())?;
        self.saved_version = self.version;
        Ok(())
    }

    /// Writes the document to `path` and makes that its path.
    pub fn save_as(&mut self, path: &Path) -> Result<(), EditorError> {
        persist::write_text(path, &self.buffer.text())?;
        self.path = Some(path.to_path_buf());
        self.saved_version = self.version;
        Ok(())
    }

    /// Captures what a background save should write, or `None` for a
    /// document without a path.
    pub fn save_snapshot(&self, doc_id: DocId) -> Option<SaveSnapshot> {
        Some(SaveSnapshot {
            doc_id,
            path: self.path.clone()?,
            text: self.buffer.text(),
            version: self.version,
        })
    }

    /// Records that the file on disk now holds `version`. An older version
    /// than the current one leaves the document dirty.
    pub fn mark_saved(&mut self, version: u64) {
        self.saved_version = version;
    }

    // ==================== Primitives ====================

    /// Runs `f` as one undoable batch. Returns true if content changed.
    pub fn transact(&mut self, f: impl FnOnce(&mut Self)) -> bool {
        if !self.history.is_recording() {
            self.batch_change = None;
        }
        self.history.begin(self.cursor.position());
        f(self);
        let committed = self.history.commit(self.cursor.position());
        if committed {
            let change = self.batch_change.take();
            self.content_changed(change);
        }
        committed
    }

    /// Applies and records one primitive. Returns false if it was a no-op.
    fn apply(&mut self, op: Operation) -> bool {
        let Some(applied) = op.apply(&mut self.buffer, self.engine.grid_mut()) else {
            return false;
        };
        self.track(&applied);
        if let Some(change) = applied.change() {
            self.batch_change = Some(match self.batch_change {
                Some(before) => before.then(change),
                None => change,
            });
        }
        self.history.record(applied);
        true
    }

    /// Moves marks through an applied operation.
    fn track(&mut self, op: &Operation) {
        let pos = op.transform(self.cursor.position());
        self.cursor.set(pos, &self.buffer);
        if self.selection.active {
            let anchor = op.transform(self.selection.anchor());
            let head = op.transform(self.selection.head());
            self.set_selection(anchor, head);
        }
        self.dirty_lines.merge(dirty_lines_for(op));
    }

    /// Places the cursor as part of the open batch.
    fn place_cursor(&mut self, to: Position) {
        let to = self.buffer.clamp(to);
        let from = self.cursor.position();
        let op = Operation::MoveCursor { from, to };
        if let Some(applied) = op.apply(&mut self.buffer, self.engine.grid_mut()) {
            self.history.record(applied);
        }
        self.cursor.set(to, &self.buffer);
    }

    fn set_selection(&mut self, anchor: Position, head: Position) {
        self.selection.begin_at(anchor.col, anchor.line);
        self.selection.extend_to(head.col, head.line);
    }

    /// Inserts `text` at `pos`, splitting lines at `\n`. Returns the
    /// position just after the inserted text.
    fn insert_str(&mut self, pos: Position, text: &str) -> Position {
        let mut at = self.buffer.clamp(pos);
        for ch in text.chars() {
            if ch == '\n' {
                if self.apply(Operation::Enter { row: at.line, col: at.col }) {
                    at = Position::new(at.line + 1, 0);
                }
            } else if self.apply(Operation::Insert { row: at.line, col: at.col, ch }) {
                at.col += 1;
            }
        }
        at
    }

    /// Inserts at the cursor.
    fn insert_text(&mut self, text: &str) {
        let at = self.cursor.position();
        self.insert_str(at, text);
    }

    /// Removes up to `count` characters starting at `pos`, never crossing
    /// the end of the line.
    fn remove_chars(&mut self, pos: Position, count: usize) {
        for _ in 0..count {
            let Some(ch) = self.buffer.char_at(pos.line, pos.col) else {
                return;
            };
            self.apply(Operation::Delete { row: pos.line, col: pos.col, ch });
        }
    }

    /// Deletes the text in `[start, end)`, line breaks included.
    fn delete_range(&mut self, start: Position, end: Position) {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let start = self.buffer.clamp(start);
        let end = self.buffer.clamp(end);
        let count = self.buffer.text_range(start, end).chars().count();
        for _ in 0..count {
            match self.buffer.char_at(start.line, start.col) {
                Some(ch) => self.apply(Operation::Delete { row: start.line, col: start.col, ch }),
                None => self.apply(Operation::DeleteLine { row: start.line, col: start.col }),
            };
        }
    }

    /// Deletes the selected text and clears the selection. Returns false
    /// if nothing was selected.
    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection.range() else {
            self.selection.clear();
            return false;
        };
        self.selection.clear();
        self.delete_range(start, end);
        self.place_cursor(start);
        true
    }

    /// Replaces a whole line's content as deletes followed by inserts.
    fn replace_line(&mut self, row: usize, content: &str) {
        let len = self.buffer.line_len(row);
        self.remove_chars(Position::new(row, 0), len);
        self.insert_str(Position::new(row, 0), content);
    }

    /// Bumps the version and recolors. Without a `change` the whole text
    /// is recolored.
    fn content_changed(&mut self, change: Option<TextChange>) {
        self.version += 1;
        self.cursor.clamp(&self.buffer);
        self.selection.clamp(&self.buffer);
        let text = self.buffer.text();
        let dirty = match change {
            Some(change) => self.engine.update(&text, &change),
            None => self.engine.colorize_all(&text),
        };
        self.dirty_lines.merge(dirty);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        let (rows, cols) = self.viewport;
        self.cursor.scroll_into_view(&self.buffer, rows, cols, self.tab_width);
    }

    /// Rows covered by the selection, or the cursor row.
    fn row_block(&self) -> (usize, usize) {
        let rows = if self.selection.has_selection() {
            self.selection.selected_lines(&self.buffer)
        } else {
            Vec::new()
        };
        match (rows.first(), rows.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (self.cursor.row(), self.cursor.row()),
        }
    }

    /// Selected rows when the selection spans more than one row.
    fn multi_line_rows(&self) -> Option<Vec<usize>> {
        let (start, end) = self.selection.range()?;
        (start.line != end.line).then(|| self.selection.selected_lines(&self.buffer))
    }

    // ==================== Edit operations ====================

    /// Types a character, replacing the selection. `\n` behaves like Enter.
    pub fn add_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.enter();
        }
        self.transact(|doc| {
            doc.delete_selection();
            doc.insert_text(&ch.to_string());
        })
    }

    /// Deletes the selection, the character before the cursor, or the line
    /// break before the cursor.
    pub fn backspace(&mut self) -> bool {
        self.transact(|doc| {
            if doc.delete_selection() {
                return;
            }
            let Position { line, col } = doc.cursor.position();
            if col > 0 {
                doc.remove_chars(Position::new(line, col - 1), 1);
            } else if line > 0 {
                let prev_len = doc.buffer.line_len(line - 1);
                doc.apply(Operation::DeleteLine { row: line - 1, col: prev_len });
            }
        })
    }

    /// Deletes the selection, the character under the cursor, or the line
    /// break after the cursor.
    pub fn delete_forward(&mut self) -> bool {
        self.transact(|doc| {
            if doc.delete_selection() {
                return;
            }
            let Position { line, col } = doc.cursor.position();
            if col < doc.buffer.line_len(line) {
                doc.remove_chars(Position::new(line, col), 1);
            } else if line + 1 < doc.buffer.line_count() {
                doc.apply(Operation::DeleteLine { row: line, col });
            }
        })
    }

    /// Splits the line at the cursor and indents the new line.
    ///
    /// The new line copies the leading whitespace before the cursor. After
    /// an opening bracket it gets one more indent unit, and a matching
    /// closer right after the cursor moves to its own line at the original
    /// indent.
    pub fn enter(&mut self) -> bool {
        let unit = self.indent.unit();
        self.transact(|doc| {
            doc.delete_selection();
            let Position { line: row, col } = doc.cursor.position();
            let line = doc.buffer.line(row);
            let indent: String = line[..doc.buffer.indent_len(row).min(col)].iter().collect();
            let opener = line[..col].iter().rev().find(|c| !c.is_whitespace()).copied();
            let next = line.get(col).copied();

            doc.apply(Operation::Enter { row, col });
            doc.insert_text(&indent);

            let Some(closer) = opener.and_then(closer_for) else {
                return;
            };
            doc.insert_text(&unit);
            if next == Some(closer) {
                let inner = doc.cursor.position();
                doc.apply(Operation::Enter { row: inner.line, col: inner.col });
                doc.insert_text(&indent);
                doc.place_cursor(inner);
            }
        })
    }

    /// Inserts one indent unit, or indents every selected line when the
    /// selection spans several rows.
    pub fn tab(&mut self) -> bool {
        let unit = self.indent.unit();
        match self.multi_line_rows() {
            Some(rows) => self.transact(|doc| {
                for row in rows {
                    doc.insert_str(Position::new(row, 0), &unit);
                }
            }),
            None => self.transact(|doc| {
                doc.delete_selection();
                doc.insert_text(&unit);
            }),
        }
    }

    /// Removes up to one indent unit from the start of each affected line.
    pub fn untab(&mut self) -> bool {
        let rows = self
            .multi_line_rows()
            .unwrap_or_else(|| vec![self.cursor.row()]);
        let width = match self.indent {
            Indent::Tab => self.tab_width,
            Indent::Spaces(n) => n.max(1),
        };
        self.transact(|doc| {
            for row in rows {
                let line = doc.buffer.line(row);
                let count = if line.first() == Some(&'\t') {
                    1
                } else {
                    line.iter().take(width).take_while(|c| **c == ' ').count()
                };
                doc.remove_chars(Position::new(row, 0), count);
            }
        })
    }

    /// Comments or uncomments the cursor line or the selected lines.
    ///
    /// If every non-blank line is already commented they are uncommented,
    /// otherwise each non-blank line is commented after its indentation.
    /// Languages without comment syntax are left alone.
    pub fn toggle_comment(&mut self) -> bool {
        let Some(style) = self.language().comment_style() else {
            return false;
        };
        let (first, last) = self.row_block();
        let rows: Vec<usize> = (first..=last)
            .filter(|&row| !self.buffer.line_string(row).trim().is_empty())
            .collect();
        if rows.is_empty() {
            return false;
        }
        let uncomment = rows
            .iter()
            .all(|&row| is_commented(&self.buffer.line_string(row), style));
        self.transact(|doc| {
            for &row in &rows {
                if uncomment {
                    doc.uncomment_line(row, style);
                } else {
                    doc.comment_line(row, style);
                }
            }
        })
    }

    fn comment_line(&mut self, row: usize, style: CommentStyle) {
        let indent = self.buffer.indent_len(row);
        match style {
            CommentStyle::Line(token) => {
                self.insert_str(Position::new(row, indent), &format!("{token} "));
            }
            CommentStyle::Block { open, close } => {
                let end = self.buffer.line_len(row);
                self.insert_str(Position::new(row, end), &format!(" {close}"));
                self.insert_str(Position::new(row, indent), &format!("{open} "));
            }
        }
    }

    fn uncomment_line(&mut self, row: usize, style: CommentStyle) {
        let indent = self.buffer.indent_len(row);
        let open = match style {
            CommentStyle::Line(token) => token,
            CommentStyle::Block { open, close } => {
                let open_len = open.chars().count();
                let close_len = close.chars().count();
                let end = self.buffer.line_string(row).trim_end().chars().count();
                let at = end.saturating_sub(close_len);
                self.remove_chars(Position::new(row, at), close_len);
                if at > indent + open_len && self.buffer.char_at(row, at - 1) == Some(' ') {
                    self.remove_chars(Position::new(row, at - 1), 1);
                }
                open
            }
        };
        let pos = Position::new(row, indent);
        let line = self.buffer.line(row);
        if !line[indent..].iter().copied().take(open.chars().count()).eq(open.chars()) {
            return;
        }
        self.remove_chars(pos, open.chars().count());
        if self.buffer.char_at(row, indent) == Some(' ') {
            self.remove_chars(pos, 1);
        }
    }

    /// Moves the cursor line (or selected lines) up by one.
    pub fn swap_line_up(&mut self) -> bool {
        self.swap_block(false)
    }

    /// Moves the cursor line (or selected lines) down by one.
    pub fn swap_line_down(&mut self) -> bool {
        self.swap_block(true)
    }

    fn swap_block(&mut self, down: bool) -> bool {
        let (first, last) = self.row_block();
        let (lo, hi) = if down {
            if last + 1 >= self.buffer.line_count() {
                return false;
            }
            (first, last + 1)
        } else {
            if first == 0 {
                return false;
            }
            (first - 1, last)
        };

        let mut lines: Vec<String> = (lo..=hi).map(|row| self.buffer.line_string(row)).collect();
        if down {
            lines.rotate_right(1);
        } else {
            lines.rotate_left(1);
        }
        let shift = |p: Position| {
            let line = if down { p.line + 1 } else { p.line - 1 };
            Position::new(line, p.col)
        };
        let cursor = shift(self.cursor.position());
        let selection = self
            .selection
            .active
            .then(|| (shift(self.selection.anchor()), shift(self.selection.head())));

        self.transact(|doc| {
            for (i, content) in lines.iter().enumerate() {
                doc.replace_line(lo + i, content);
            }
            doc.place_cursor(cursor);
            if let Some((anchor, head)) = selection {
                doc.set_selection(anchor, head);
            }
        })
    }

    /// Copies the selection, or the cursor line with its newline, to the
    /// clipboard. Returns false if there was nothing to copy.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        let text = if self.selection.has_selection() {
            self.selection.selection_text(&self.buffer)
        } else {
            format!("{}\n", self.buffer.line_string(self.cursor.row()))
        };
        clipboard.set_text(text);
        true
    }

    /// Like [`copy`](Self::copy), then deletes what was copied.
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        self.copy(clipboard);
        if self.selection.has_selection() {
            return self.transact(|doc| {
                doc.delete_selection();
            });
        }
        let row = self.cursor.row();
        self.transact(|doc| {
            let len = doc.buffer.line_len(row);
            if row + 1 < doc.buffer.line_count() {
                doc.delete_range(Position::new(row, 0), Position::new(row + 1, 0));
            } else if row > 0 {
                let prev = Position::new(row - 1, doc.buffer.line_len(row - 1));
                doc.delete_range(prev, Position::new(row, len));
            } else {
                doc.delete_range(Position::new(row, 0), Position::new(row, len));
            }
        })
    }

    /// Inserts the clipboard text at the cursor, replacing the selection.
    pub fn paste(&mut self, clipboard: &dyn Clipboard) -> bool {
        let Some(text) = clipboard.text().filter(|t| !t.is_empty()) else {
            return false;
        };
        self.transact(|doc| {
            doc.delete_selection();
            doc.insert_text(&text);
        })
    }

    /// Duplicates the cursor line (or selected lines) below itself.
    pub fn duplicate(&mut self) -> bool {
        let (first, last) = self.row_block();
        let block = (first..=last)
            .map(|row| self.buffer.line_string(row))
            .collect::<Vec<_>>()
            .join("\n");
        let n = last - first + 1;
        let down = |p: Position| Position::new(p.line + n, p.col);
        let cursor = down(self.cursor.position());
        let selection = self
            .selection
            .active
            .then(|| (down(self.selection.anchor()), down(self.selection.head())));

        self.transact(|doc| {
            let end = Position::new(last, doc.buffer.line_len(last));
            doc.insert_str(end, &format!("\n{block}"));
            doc.place_cursor(cursor);
            if let Some((anchor, head)) = selection {
                doc.set_selection(anchor, head);
            }
        })
    }

    // ==================== Cursor and selection ====================

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.buffer);
        self.cursor.set(self.buffer.end_position(), &self.buffer);
        self.scroll_to_cursor();
    }

    /// Clears the selection. Returns true if there was one.
    pub fn escape(&mut self) -> bool {
        let had = self.selection.active;
        self.selection.clear();
        had
    }

    /// Places the cursor at (row, col), clamped, and drops the selection.
    pub fn click(&mut self, row: usize, col: usize) {
        self.selection.clear();
        self.cursor.set(Position::new(row, col), &self.buffer);
        self.scroll_to_cursor();
    }

    /// Extends a selection from the cursor to (row, col).
    pub fn drag_to(&mut self, row: usize, col: usize) {
        if !self.selection.active {
            let p = self.cursor.position();
            self.selection.begin_at(p.col, p.line);
        }
        self.cursor.set(Position::new(row, col), &self.buffer);
        let p = self.cursor.position();
        self.selection.extend_to(p.col, p.line);
        self.scroll_to_cursor();
    }

    /// Moves the cursor. With `extend` the selection follows it; without,
    /// the selection is cleared.
    pub fn move_cursor(&mut self, motion: Motion, extend: bool) {
        if extend {
            if !self.selection.active {
                let p = self.cursor.position();
                self.selection.begin_at(p.col, p.line);
            }
        } else {
            self.selection.clear();
        }
        self.cursor.apply(motion, &self.buffer, self.viewport.0);
        if extend {
            let p = self.cursor.position();
            self.selection.extend_to(p.col, p.line);
        }
        self.scroll_to_cursor();
    }

    // ==================== Undo / redo ====================

    /// Undoes the newest batch. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(batch) = self.history.undo(self.cursor.position()) else {
            return false;
        };
        for op in batch.ops.iter().rev() {
            self.replay(op.invert());
        }
        self.finish_replay(batch.cursor_before);
        true
    }

    /// Redoes the newest undone batch. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        let Some(batch) = self.history.redo(self.cursor.position()) else {
            return false;
        };
        for op in &batch.ops {
            self.replay(*op);
        }
        self.finish_replay(batch.cursor_after);
        true
    }

    fn replay(&mut self, op: Operation) {
        if let Some(applied) = op.apply(&mut self.buffer, self.engine.grid_mut()) {
            self.dirty_lines.merge(dirty_lines_for(&applied));
        }
    }

    fn finish_replay(&mut self, cursor: Position) {
        self.selection.clear();
        self.cursor.set(cursor, &self.buffer);
        self.content_changed(None);
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("language", &self.language())
            .field("lines", &self.buffer.line_count())
            .field("version", &self.version)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

fn dirty_lines_for(op: &Operation) -> DirtyLines {
    match *op {
        Operation::Insert { row, .. } | Operation::Delete { row, .. } => DirtyLines::Single(row),
        Operation::Enter { row, .. } | Operation::DeleteLine { row, .. } => {
            DirtyLines::FromLineToEnd(row)
        }
        Operation::MoveCursor { .. } => DirtyLines::None,
    }
}

fn closer_for(open: char) -> Option<char> {
    match open {
        '{' => Some('}'),
        '[' => Some(']'),
        '(' => Some(')'),
        _ => None,
    }
}

fn is_commented(line: &str, style: CommentStyle) -> bool {
    let body = line.trim();
    match style {
        CommentStyle::Line(token) => body.starts_with(token),
        CommentStyle::Block { open, close } => {
            body.len() >= open.len() + close.len() && body.starts_with(open) && body.ends_with(close)
        }
    }
}
