// Chunk: docs/chunks/line_buffer - Line buffer, cursor and selection model

//! quill-buffer: content model for the quill editing core.
//!
//! This crate owns everything that describes *what* is in a document and
//! *where* the user is in it, without knowing about syntax or history.
//!
//! # Overview
//!
//! - [`LineBuffer`]: the lines of a document, each a vector of `char`s. Always
//!   holds at least one line. Its six raw mutations (`insert_char`,
//!   `remove_char`, `split_line`, `join_line`, `insert_line`, `remove_line`)
//!   are the only way content changes.
//! - [`Cursor`]: (row, col) plus scroll offsets, moved by [`Motion`]s.
//! - [`Selection`]: a two-point range stored in input order and normalized by
//!   every query.
//! - [`Style`] / [`Color`]: what a color id resolves to on screen.
//!
//! # Example
//!
//! ```
//! use quill_buffer::{LineBuffer, Position, Selection};
//!
//! let mut buffer = LineBuffer::from_text("hello\nworld");
//! buffer.split_line(0, 2);
//! assert_eq!(buffer.line_count(), 3);
//! assert_eq!(buffer.line_string(1), "llo");
//!
//! let mut selection = Selection::new();
//! selection.begin_at(1, 2);
//! selection.extend_to(0, 1);
//! assert_eq!(selection.selection_text(&buffer), "llo\nw");
//! assert_eq!(selection.normalized().0, Position::new(1, 0));
//! ```

mod cursor;
mod line_buffer;
mod selection;
mod style;
mod types;

pub use cursor::{display_col, Cursor, Motion};
pub use line_buffer::LineBuffer;
pub use selection::Selection;
pub use style::{Color, NamedColor, Style};
pub use types::{DirtyLines, Position};
