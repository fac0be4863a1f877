// Chunk: docs/chunks/syntax_highlighting - Structural and query coloring passes

//! The two coloring passes that write into a [`ColorGrid`].
//!
//! 1. The structural pass walks a subtree in pre-order. A node whose kind is
//!    in the theme's node-kind table paints every character it spans, so
//!    deeper nodes refine what their ancestors painted.
//! 2. The query pass runs the language's highlight query over the same byte
//!    range. Captures are applied outer-to-inner and override the structural
//!    colors.
//!
//! Both passes only ever write inside a byte window, which is how the
//! incremental path limits itself to the covering node and the large-file
//! path limits itself to the first rows.

use std::ops::Range;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::color_grid::{ColorGrid, ColorId, UNRESOLVED};
use crate::theme::SyntaxTheme;

/// Builds the byte offset of every line start. `offsets[0]` is always 0 and
/// `offsets[n]` is the byte right after the `\n` that ended line `n - 1`.
pub(crate) fn build_line_offsets(source: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, b) in source.as_bytes().iter().enumerate() {
        if *b == b'\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Writes colors for byte spans into a grid whose rows are the lines of
/// `source`, never touching cells outside `window`.
pub(crate) struct Painter<'a> {
    source: &'a str,
    line_offsets: &'a [usize],
    grid: &'a mut ColorGrid,
    window: Range<usize>,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        source: &'a str,
        line_offsets: &'a [usize],
        grid: &'a mut ColorGrid,
        window: Range<usize>,
    ) -> Self {
        let end = window.end.min(source.len());
        let start = window.start.min(end);
        Self {
            source,
            line_offsets,
            grid,
            window: start..end,
        }
    }

    pub(crate) fn window(&self) -> Range<usize> {
        self.window.clone()
    }

    /// Paints every character in `[start, end)`, clipped to the window.
    /// Line breaks have no cell and are skipped.
    pub(crate) fn paint(&mut self, start: usize, end: usize, id: ColorId) {
        let start = start.max(self.window.start);
        let end = end.min(self.window.end);
        if start >= end {
            return;
        }

        let first_row = self.line_offsets.partition_point(|&off| off <= start) - 1;
        for row in first_row..self.line_offsets.len() {
            let line_start = self.line_offsets[row];
            if line_start >= end {
                break;
            }
            let line_end = self
                .line_offsets
                .get(row + 1)
                .map_or(self.source.len(), |next| next - 1);

            let a = start.max(line_start);
            let b = end.min(line_end);
            if a >= b {
                continue;
            }
            let (Some(prefix), Some(span)) = (self.source.get(line_start..a), self.source.get(a..b)) else {
                continue;
            };
            let first_col = prefix.chars().count();
            for col in first_col..first_col + span.chars().count() {
                self.grid.set(row, col, id);
            }
        }
    }

    /// Resets the whole window to `id`.
    pub(crate) fn fill(&mut self, id: ColorId) {
        let Range { start, end } = self.window();
        self.paint(start, end, id);
    }
}

/// Structural pass over `node`'s subtree, pre-order so that children
/// override their parents.
pub(crate) fn color_structure(node: Node<'_>, theme: &SyntaxTheme, painter: &mut Painter<'_>) {
    let window = painter.window();
    let mut cursor = node.walk();
    let mut depth = 0usize;

    loop {
        let current = cursor.node();
        let overlaps = current.start_byte() < window.end && current.end_byte() > window.start;

        if overlaps {
            if let Some(id) = theme.color_for_node_kind(current.kind()) {
                painter.paint(current.start_byte(), current.end_byte(), id);
            }
            if cursor.goto_first_child() {
                depth += 1;
                continue;
            }
        }

        // Advance to the next sibling, climbing out of finished subtrees.
        loop {
            if depth == 0 {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            cursor.goto_parent();
            depth -= 1;
        }
    }
}

/// Query pass: runs `query` from `root`, limited to the painter's window.
///
/// `capture_colors[i]` is the color of capture index `i`. Unresolved
/// captures leave the structural color in place.
pub(crate) fn color_captures(
    root: Node<'_>,
    query: &Query,
    capture_colors: &[ColorId],
    source: &str,
    painter: &mut Painter<'_>,
) {
    let window = painter.window();
    let mut cursor = QueryCursor::new();
    cursor.set_byte_range(window);

    // (start_byte, end_byte, pattern_index, color)
    let mut hits: Vec<(usize, usize, usize, ColorId)> = Vec::new();
    let mut captures = cursor.captures(query, root, source.as_bytes());
    while let Some((mat, capture_idx)) = captures.next() {
        let capture = &mat.captures[*capture_idx];
        let id = capture_colors
            .get(capture.index as usize)
            .copied()
            .unwrap_or(UNRESOLVED);
        if id == UNRESOLVED {
            continue;
        }
        let node = capture.node;
        hits.push((node.start_byte(), node.end_byte(), mat.pattern_index, id));
    }

    // Outer spans first so inner ones land on top; for the same span the
    // earliest pattern is applied last and wins.
    hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(b.2.cmp(&a.2)));
    for (start, end, _, id) in hits {
        painter.paint(start, end, id);
    }
}

/// What a coloring pass needs besides the tree and the text.
pub(crate) struct Rules<'a> {
    pub theme: &'a SyntaxTheme,
    pub query: &'a Query,
    pub capture_colors: &'a [ColorId],
}

/// Recolors `window`, which must lie inside `node`: seeds it with the color
/// inherited from `node`'s ancestors, then runs both passes.
pub(crate) fn recolor(
    rules: &Rules<'_>,
    root: Node<'_>,
    node: Node<'_>,
    source: &str,
    line_offsets: &[usize],
    grid: &mut ColorGrid,
    window: Range<usize>,
) {
    let mut painter = Painter::new(source, line_offsets, grid, window);
    painter.fill(inherited_color(node, rules.theme));
    color_structure(node, rules.theme, &mut painter);
    color_captures(root, rules.query, rules.capture_colors, source, &mut painter);
}

/// Returns the color the structural pass leaves under `node` before
/// visiting it: that of the deepest strict ancestor with a node-kind color.
pub(crate) fn inherited_color(node: Node<'_>, theme: &SyntaxTheme) -> ColorId {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if let Some(id) = theme.color_for_node_kind(ancestor.kind()) {
            return id;
        }
        current = ancestor.parent();
    }
    UNRESOLVED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_offsets() {
        assert_eq!(build_line_offsets("ab\n\ncd\n"), vec![0, 3, 4, 7]);
        assert_eq!(build_line_offsets(""), vec![0]);
    }

    #[test]
    fn test_paint_spans_lines_and_skips_newlines() {
        let source = "ab\ncd";
        let offsets = build_line_offsets(source);
        let mut grid = ColorGrid::for_text(source);
        let mut painter = Painter::new(source, &offsets, &mut grid, 0..source.len());
        painter.paint(1, 4, 3);
        assert_eq!(grid.row(0), &[UNRESOLVED, 3]);
        assert_eq!(grid.row(1), &[3, UNRESOLVED]);
    }

    #[test]
    fn test_paint_uses_char_columns() {
        let source = "\u{1F600}xy";
        let offsets = build_line_offsets(source);
        let mut grid = ColorGrid::for_text(source);
        let mut painter = Painter::new(source, &offsets, &mut grid, 0..source.len());
        painter.paint(4, 5, 2);
        assert_eq!(grid.row(0), &[UNRESOLVED, 2, UNRESOLVED]);
    }

    #[test]
    fn test_paint_clips_to_window() {
        let source = "abcdef";
        let offsets = build_line_offsets(source);
        let mut grid = ColorGrid::for_text(source);
        let mut painter = Painter::new(source, &offsets, &mut grid, 2..4);
        painter.paint(0, 6, 1);
        assert_eq!(grid.row(0), &[UNRESOLVED, UNRESOLVED, 1, 1, UNRESOLVED, UNRESOLVED]);
    }
}
