// Chunk: docs/chunks/syntax_highlighting - Color grid owner with optional syntax

//! `HighlightEngine` is what a document holds: the color grid plus, when the
//! language has a grammar, the incremental highlighter that fills it.
//!
//! Plain-text documents (or documents whose grammar failed to load) still
//! get a grid. It stays shape-correct through the splice methods and simply
//! never leaves `UNRESOLVED`.

use std::sync::Arc;

use log::{debug, warn};
use quill_buffer::{DirtyLines, Style};

use crate::color_grid::{ColorGrid, ColorId};
use crate::edit::TextChange;
use crate::highlighter::SyntaxHighlighter;
use crate::job::{ColorizeJob, ColorizeResult};
use crate::language::Language;
use crate::theme::SyntaxTheme;

pub struct HighlightEngine {
    language: Language,
    grid: ColorGrid,
    syntax: Option<SyntaxHighlighter>,
    theme: Arc<SyntaxTheme>,
}

impl HighlightEngine {
    /// Creates an engine for `text`. The grid starts unresolved; call
    /// [`colorize_all`](Self::colorize_all) or
    /// [`colorize_initial`](Self::colorize_initial) to color it.
    pub fn new(language: Language, text: &str, theme: Arc<SyntaxTheme>) -> Self {
        let syntax = if language.grammar().is_some() {
            match SyntaxHighlighter::new(language, text, Arc::clone(&theme)) {
                Ok(hl) => Some(hl),
                Err(err) => {
                    warn!("highlighting disabled: {err}");
                    None
                }
            }
        } else {
            None
        };

        Self {
            language,
            grid: ColorGrid::for_text(text),
            syntax,
            theme,
        }
    }

    /// An engine that never colors anything.
    pub fn plain(text: &str) -> Self {
        Self::new(Language::PlainText, text, Arc::new(SyntaxTheme::default()))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn has_syntax(&self) -> bool {
        self.syntax.is_some()
    }

    pub fn highlighter(&self) -> Option<&SyntaxHighlighter> {
        self.syntax.as_ref()
    }

    pub fn theme(&self) -> &SyntaxTheme {
        &self.theme
    }

    pub fn grid(&self) -> &ColorGrid {
        &self.grid
    }

    /// Mutable access for the raw splices that keep the grid in shape with
    /// the buffer between an edit and its recolor.
    pub fn grid_mut(&mut self) -> &mut ColorGrid {
        &mut self.grid
    }

    pub fn color_at(&self, row: usize, col: usize) -> ColorId {
        self.grid.get(row, col)
    }

    /// Resolves the cell at (row, col) through the theme.
    pub fn style_at(&self, row: usize, col: usize) -> Style {
        self.theme.style(self.grid.get(row, col))
    }

    /// Generation of the last parse, 0 without syntax.
    pub fn generation(&self) -> u64 {
        self.syntax.as_ref().map_or(0, SyntaxHighlighter::generation)
    }

    /// Reparses `text` from scratch and recolors every cell.
    pub fn colorize_all(&mut self, text: &str) -> DirtyLines {
        match self.syntax.as_mut() {
            Some(hl) => hl.colorize_all(text, &mut self.grid),
            None => {
                self.grid = ColorGrid::for_text(text);
                DirtyLines::FromLineToEnd(0)
            }
        }
    }

    /// Colors a freshly opened document.
    ///
    /// Above `large_file_lines` lines only the first `initial_rows` are
    /// colored here and a job for the full pass is returned.
    pub fn colorize_initial(
        &mut self,
        text: &str,
        large_file_lines: usize,
        initial_rows: usize,
    ) -> Option<ColorizeJob> {
        let hl = match self.syntax.as_mut() {
            Some(hl) => hl,
            None => {
                self.grid = ColorGrid::for_text(text);
                return None;
            }
        };
        let lines = text.split('\n').count();
        if lines <= large_file_lines {
            hl.colorize_all(text, &mut self.grid);
            return None;
        }
        debug!("{lines} lines: coloring first {initial_rows} now, the rest in the background");
        hl.colorize_prefix(text, &mut self.grid, initial_rows);
        Some(hl.background_job())
    }

    /// Recolors after an edit. The grid must already have been spliced to
    /// `text`'s shape, with the new cells inside `change`.
    pub fn update(&mut self, text: &str, change: &TextChange) -> DirtyLines {
        match self.syntax.as_mut() {
            Some(hl) => hl.edit(text, change, &mut self.grid),
            None => DirtyLines::None,
        }
    }

    /// Snapshot for a full pass on another thread.
    pub fn background_job(&self) -> Option<ColorizeJob> {
        self.syntax.as_ref().map(SyntaxHighlighter::background_job)
    }

    /// Installs a background result if it was computed for the current
    /// generation and still matches the grid's shape. Returns false for a
    /// stale result, which is dropped.
    pub fn install(&mut self, result: ColorizeResult) -> bool {
        let current = self.generation();
        if result.generation != current || !self.grid.matches_shape(result.grid.shape()) {
            debug!(
                "dropping stale colors for generation {} (now {current})",
                result.generation
            );
            return false;
        }
        self.grid = result.grid;
        true
    }
}

impl std::fmt::Debug for HighlightEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightEngine")
            .field("language", &self.language)
            .field("has_syntax", &self.has_syntax())
            .field("generation", &self.generation())
            .field("rows", &self.grid.row_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_grid::UNRESOLVED;
    use quill_buffer::Position;

    fn rust_engine(text: &str) -> HighlightEngine {
        HighlightEngine::new(Language::Rust, text, Arc::new(SyntaxTheme::catppuccin_mocha()))
    }

    #[test]
    fn test_plain_engine_keeps_shape_and_no_colors() {
        let mut engine = HighlightEngine::plain("ab\ncd");
        assert!(!engine.has_syntax());
        engine.grid_mut().insert_cell(0, 0);
        let change = TextChange::insertion(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(engine.update("xab\ncd", &change), DirtyLines::None);
        assert_eq!(engine.grid().shape(), vec![3, 2]);
        assert_eq!(engine.color_at(0, 0), UNRESOLVED);
        assert_eq!(engine.style_at(0, 0), Style::default());
        assert!(engine.background_job().is_none());
    }

    #[test]
    fn test_small_file_colored_synchronously() {
        let text = "fn main() {}";
        let mut engine = rust_engine(text);
        assert!(engine.colorize_initial(text, 10, 2).is_none());
        assert_ne!(engine.color_at(0, 0), UNRESOLVED);
    }

    #[test]
    fn test_large_file_two_phase() {
        let text = (0..20).map(|i| format!("fn f{i}() {{}}")).collect::<Vec<_>>().join("\n");
        let mut engine = rust_engine(&text);
        let job = engine.colorize_initial(&text, 10, 5).expect("large file spawns a job");
        assert_ne!(engine.color_at(4, 0), UNRESOLVED);
        assert_eq!(engine.color_at(15, 0), UNRESOLVED);

        assert!(engine.install(job.run()));
        assert_ne!(engine.color_at(15, 0), UNRESOLVED);
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let text = (0..20).map(|i| format!("fn f{i}() {{}}")).collect::<Vec<_>>().join("\n");
        let mut engine = rust_engine(&text);
        let job = engine.colorize_initial(&text, 10, 5).unwrap();

        let edited = text.replacen("fn f0()", "fn f0x()", 1);
        engine.grid_mut().insert_cell(0, 5);
        engine.update(&edited, &TextChange::insertion(Position::new(0, 5), Position::new(0, 6)));

        assert!(!engine.install(job.run()));
        assert_eq!(engine.color_at(15, 0), UNRESOLVED);

        let fresh = engine.background_job().unwrap();
        assert!(engine.install(fresh.run()));
        assert_ne!(engine.color_at(15, 0), UNRESOLVED);
    }
}
