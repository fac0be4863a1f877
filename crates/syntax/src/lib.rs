// Chunk: docs/chunks/syntax_highlighting - Tree-sitter incremental color grid

//! quill-syntax: incremental tree-sitter highlighting into a color grid.
//!
//! The grid holds one [`ColorId`] per buffer character and is kept parallel
//! to the buffer's lines. After each edit the highlighter reparses
//! incrementally and recolors only the smallest syntax node covering the
//! change, so the common case never walks the whole file.
//!
//! # Overview
//!
//! - [`HighlightEngine`]: what a document owns. Holds the [`ColorGrid`] and,
//!   when the language has a grammar, a [`SyntaxHighlighter`].
//! - [`SyntaxHighlighter`]: owns a tree-sitter `Parser` and `Tree`; `edit()`
//!   applies one change, `colorize_all()` starts over.
//! - [`TextChange`] / [`EditEvent`]: the edit envelope in buffer and
//!   tree-sitter coordinates.
//! - [`Language`]: the closed set of supported languages, with grammar,
//!   highlight query and comment syntax.
//! - [`SyntaxTheme`]: maps capture names and node kinds to color ids and
//!   color ids to Catppuccin Mocha styles.
//! - [`ColorizeJob`]: a full coloring pass that can run on another thread.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill_syntax::{HighlightEngine, Language, SyntaxTheme, UNRESOLVED};
//!
//! let text = "fn main() {}";
//! let mut engine = HighlightEngine::new(Language::Rust, text, Arc::new(SyntaxTheme::default()));
//! engine.colorize_all(text);
//! assert_ne!(engine.color_at(0, 0), UNRESOLVED);
//! ```

mod color_grid;
mod colorize;
mod edit;
mod engine;
mod error;
mod highlighter;
mod job;
mod language;
mod theme;

pub use color_grid::{ColorGrid, ColorId, UNRESOLVED};
pub use edit::{byte_offset_to_position, position_to_byte_offset, EditEvent, TextChange};
pub use engine::HighlightEngine;
pub use error::HighlightError;
pub use highlighter::SyntaxHighlighter;
pub use job::{ColorizeJob, ColorizeResult};
pub use language::{CommentStyle, Language};
pub use theme::SyntaxTheme;
