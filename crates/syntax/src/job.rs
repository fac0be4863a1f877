// Chunk: docs/chunks/large_file_coloring - Full coloring pass off the main thread

//! Background coloring for large files.
//!
//! A [`ColorizeJob`] is a self-contained snapshot: the parse tree, the text
//! and the shared query and theme. Running it touches nothing the main loop
//! owns, so it can be moved to another thread. The result carries the
//! generation it was computed for; the engine refuses to install it if the
//! document has moved on since.

use std::sync::Arc;

use tree_sitter::{Query, Tree};

use crate::color_grid::{ColorGrid, ColorId};
use crate::colorize::{build_line_offsets, recolor, Rules};
use crate::theme::SyntaxTheme;

pub struct ColorizeJob {
    pub(crate) tree: Tree,
    pub(crate) source: String,
    pub(crate) query: Arc<Query>,
    pub(crate) capture_colors: Arc<[ColorId]>,
    pub(crate) theme: Arc<SyntaxTheme>,
    pub(crate) generation: u64,
}

/// A fully colored grid for the text a job was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorizeResult {
    pub generation: u64,
    pub grid: ColorGrid,
}

impl ColorizeJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Colors the whole snapshot.
    pub fn run(self) -> ColorizeResult {
        let line_offsets = build_line_offsets(&self.source);
        let mut grid = ColorGrid::for_text(&self.source);
        let root = self.tree.root_node();
        let rules = Rules {
            theme: &self.theme,
            query: &self.query,
            capture_colors: &self.capture_colors,
        };
        recolor(
            &rules,
            root,
            root,
            &self.source,
            &line_offsets,
            &mut grid,
            0..self.source.len(),
        );
        ColorizeResult {
            generation: self.generation,
            grid,
        }
    }
}

impl std::fmt::Debug for ColorizeJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorizeJob")
            .field("generation", &self.generation)
            .field("bytes", &self.source.len())
            .finish()
    }
}
