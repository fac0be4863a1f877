// Chunk: docs/chunks/syntax_highlighting - Incremental parser driving the color grid

//! Syntax highlighter with incremental parsing support.
//!
//! The `SyntaxHighlighter` owns a tree-sitter parser and the current parse
//! tree, and writes colors into a [`ColorGrid`] the caller keeps in shape
//! with the buffer. Per edit it:
//!
//! 1. translates the buffer change into a byte envelope against the previous
//!    snapshot and applies it with `Tree::edit`;
//! 2. reparses against the new snapshot, reusing the old tree;
//! 3. finds the smallest node covering the edit plus every range whose
//!    structure changed;
//! 4. skips coloring when that node is an error or missing node, otherwise
//!    recolors the node's span with the structural and query passes.

use std::sync::Arc;

use log::{debug, warn};
use quill_buffer::DirtyLines;
use tree_sitter::{Node, Parser, Point, Query, Tree};

use crate::color_grid::{ColorGrid, ColorId};
use crate::colorize::{build_line_offsets, recolor, Rules};
use crate::edit::{EditEvent, TextChange};
use crate::error::HighlightError;
use crate::job::ColorizeJob;
use crate::language::Language;
use crate::theme::SyntaxTheme;

/// A syntax highlighter for a single buffer.
pub struct SyntaxHighlighter {
    language: Language,
    parser: Parser,
    tree: Tree,
    /// Compiled highlight query, shared with background jobs
    query: Arc<Query>,
    /// Color of each capture index of `query`, resolved once
    capture_colors: Arc<[ColorId]>,
    theme: Arc<SyntaxTheme>,
    /// Source snapshot the tree was parsed from
    source: String,
    /// Byte offset where each line starts (line_offsets[i] = byte index of line i start).
    /// Invariants:
    /// - line_offsets.len() == number of lines in source
    /// - line_offsets[0] == 0
    /// - For i > 0: line_offsets[i] == byte index immediately after the '\n' ending line i-1
    line_offsets: Vec<usize>,
    /// Incremented on each edit or full recolor
    generation: u64,
}

impl SyntaxHighlighter {
    /// Creates a highlighter and parses `source`. Does not color anything;
    /// call [`colorize_all`](Self::colorize_all) or
    /// [`colorize_prefix`](Self::colorize_prefix) next.
    pub fn new(language: Language, source: &str, theme: Arc<SyntaxTheme>) -> Result<Self, HighlightError> {
        let name = language.id();
        let (Some(grammar), Some(query_src)) = (language.grammar(), language.highlights_query()) else {
            return Err(HighlightError::NoGrammar { language: name });
        };

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|source| HighlightError::Grammar { language: name, source })?;

        let query = Query::new(&grammar, query_src)
            .map_err(|source| HighlightError::Query { language: name, source })?;
        let capture_colors: Arc<[ColorId]> = query
            .capture_names()
            .iter()
            .map(|name| theme.color_for_capture(name))
            .collect();

        let tree = parser
            .parse(source, None)
            .ok_or(HighlightError::Parse { language: name })?;

        Ok(Self {
            language,
            parser,
            tree,
            query: Arc::new(query),
            capture_colors,
            theme,
            source: source.to_string(),
            line_offsets: build_line_offsets(source),
            generation: 0,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the current source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Returns true if the current tree contains error or missing nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Applies an edit incrementally and recolors the affected node.
    ///
    /// `grid` must already have the shape of `new_source`. Returns the rows
    /// whose colors were rewritten.
    pub fn edit(&mut self, new_source: &str, change: &TextChange, grid: &mut ColorGrid) -> DirtyLines {
        let event = EditEvent::from_change(&self.source, new_source, change);
        self.tree.edit(&event.to_input_edit());

        let Some(new_tree) = self.parser.parse(new_source, Some(&self.tree)) else {
            warn!("incremental parse failed, reparsing {} from scratch", self.language.id());
            return self.colorize_all(new_source, grid);
        };
        let changed: Vec<tree_sitter::Range> = self.tree.changed_ranges(&new_tree).collect();
        self.tree = new_tree;

        self.update_line_offsets_for_edit(&event, new_source);
        self.source = new_source.to_string();
        self.generation = self.generation.wrapping_add(1);

        let mut start = Point::new(event.start_row, event.start_col);
        let mut end = Point::new(event.new_end_row, event.new_end_col);
        for range in &changed {
            start = start.min(range.start_point);
            end = end.max(range.end_point);
        }

        let root = self.tree.root_node();
        let Some(node) = root.descendant_for_point_range(start, end).map(widen_empty) else {
            return DirtyLines::None;
        };
        if node.is_error() || node.is_missing() {
            debug!(
                "skipping recolor of {} node at {}..{}",
                node.kind(),
                node.start_byte(),
                node.end_byte()
            );
            return DirtyLines::None;
        }

        let rules = Rules {
            theme: &self.theme,
            query: &self.query,
            capture_colors: &self.capture_colors,
        };
        recolor(
            &rules,
            root,
            node,
            &self.source,
            &self.line_offsets,
            grid,
            node.start_byte()..node.end_byte(),
        );
        row_span(node.start_position().row, node.end_position().row)
    }

    /// Discards the tree, parses `source` from scratch and recolors every
    /// cell. `grid` is rebuilt to match `source`.
    pub fn colorize_all(&mut self, source: &str, grid: &mut ColorGrid) -> DirtyLines {
        self.colorize_prefix(source, grid, usize::MAX)
    }

    /// Parses `source` from scratch but colors only its first `rows` lines.
    /// The remaining rows are left unresolved for a background job.
    pub fn colorize_prefix(&mut self, source: &str, grid: &mut ColorGrid, rows: usize) -> DirtyLines {
        self.reparse(source);
        *grid = ColorGrid::for_text(source);

        let limit = self.line_offsets.get(rows).map_or(source.len(), |start| start.saturating_sub(1));
        let root = self.tree.root_node();
        let rules = Rules {
            theme: &self.theme,
            query: &self.query,
            capture_colors: &self.capture_colors,
        };
        recolor(&rules, root, root, &self.source, &self.line_offsets, grid, 0..limit);
        DirtyLines::FromLineToEnd(0)
    }

    /// Snapshots the current tree and text for a full pass off the main
    /// thread.
    pub fn background_job(&self) -> ColorizeJob {
        ColorizeJob {
            tree: self.tree.clone(),
            source: self.source.clone(),
            query: Arc::clone(&self.query),
            capture_colors: Arc::clone(&self.capture_colors),
            theme: Arc::clone(&self.theme),
            generation: self.generation,
        }
    }

    fn reparse(&mut self, source: &str) {
        match self.parser.parse(source, None) {
            Some(tree) => self.tree = tree,
            None => warn!("full parse of {} source failed, keeping previous tree", self.language.id()),
        }
        self.source = source.to_string();
        self.line_offsets = build_line_offsets(source);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Updates the line offset index for an incremental edit.
    ///
    /// This adjusts offsets after the edit point by the byte delta and handles
    /// any newlines added or removed in the edit.
    fn update_line_offsets_for_edit(&mut self, event: &EditEvent, new_source: &str) {
        let old_start = event.start_byte;
        let old_end = event.old_end_byte;
        let new_end = event.new_end_byte;
        let delta = (new_end as isize) - (old_end as isize);

        // Lines whose start is <= old_start are unaffected by the edit
        let first_affected = self.line_offsets.partition_point(|&off| off <= old_start);
        let mut new_offsets: Vec<usize> = self.line_offsets[..first_affected].to_vec();

        // Newlines in the inserted text start new lines
        let inserted = new_source.as_bytes().get(old_start..new_end).unwrap_or(&[]);
        for (i, b) in inserted.iter().enumerate() {
            if *b == b'\n' {
                new_offsets.push(old_start + i + 1);
            }
        }

        // A line starting at X was created by the newline at X-1; if that
        // newline was in the deleted range, the line is gone.
        for &off in &self.line_offsets[first_affected..] {
            if off <= old_end {
                continue;
            }
            new_offsets.push(((off as isize) + delta) as usize);
        }

        self.line_offsets = new_offsets;
    }
}

/// Climbs out of zero-width nodes so there is always a span to recolor.
fn widen_empty(mut node: Node<'_>) -> Node<'_> {
    while node.start_byte() == node.end_byte() {
        match node.parent() {
            Some(parent) => node = parent,
            None => break,
        }
    }
    node
}

fn row_span(first: usize, last: usize) -> DirtyLines {
    if first == last {
        DirtyLines::Single(first)
    } else {
        DirtyLines::Range {
            from: first,
            to: last + 1,
        }
    }
}
