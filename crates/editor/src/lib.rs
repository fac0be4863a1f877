// Chunk: docs/chunks/editable_buffer - Editing core library interface
//!
//! quill: the editing core of a terminal text editor.
//!
//! A [`Document`] ties a line buffer, cursor, selection, undo history and
//! incremental syntax coloring together so that every edit operation leaves
//! all of them consistent. An [`Editor`] owns many documents, routes
//! [`Command`]s to the active one and applies results of background saves
//! and coloring passes that arrive over the event channel.
//!
//! Rendering, input decoding and language-server transport live in the
//! front end; this crate exposes what they need (text, path, language id,
//! cursor, change hooks, colors per cell).
//!
//! # Example
//!
//! ```
//! use quill::{Command, Editor, EditorConfig};
//! use quill_syntax::Language;
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! editor.new_document("", Language::PlainText);
//! editor.execute(Command::Insert('x'));
//! assert_eq!(editor.active_document().unwrap().text(), "x");
//! editor.execute(Command::Undo);
//! assert_eq!(editor.active_document().unwrap().text(), "");
//! ```

mod clipboard;
mod config;
mod core_event;
mod diagnostics;
mod document;
mod editor;
mod error;
mod event_channel;
mod history;
mod persist;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::{config_file_path, EditorConfig, Indent, APP_NAME};
pub use core_event::{CoreEvent, DocId};
pub use diagnostics::{Diagnostic, Severity};
pub use document::Document;
pub use editor::{ChangeHook, Command, Editor};
pub use error::EditorError;
pub use event_channel::{create_event_channel, EventReceiver, EventSender};
pub use history::{EditBatch, History, Operation};
pub use persist::{read_buffer, write_text, SaveSnapshot};
