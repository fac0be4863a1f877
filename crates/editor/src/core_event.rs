// Chunk: docs/chunks/background_completions - Events delivered to the main loop
//! Events sent from background work to the editor's main loop.
//!
//! Background threads never touch a document. They send one of these
//! through the event channel and the main loop, which owns every buffer and
//! color grid, applies them in order.

use std::path::PathBuf;

use quill_syntax::ColorizeResult;

use crate::diagnostics::Diagnostic;

/// Identifies an open document across threads.
pub type DocId = u64;

#[derive(Debug)]
pub enum CoreEvent {
    /// A full coloring pass finished for a large file.
    BackgroundColors { doc: DocId, result: ColorizeResult },

    /// A background save finished. `error` holds the failure message.
    SaveFinished {
        doc: DocId,
        version: u64,
        error: Option<String>,
    },

    /// A language server published diagnostics for a file.
    Diagnostics {
        path: PathBuf,
        diagnostics: Vec<Diagnostic>,
    },

    /// Something changed that needs repainting.
    ///
    /// Debounced: at most one is pending at a time.
    Redraw,
}

impl CoreEvent {
    /// Returns true if this event targets a single document.
    pub fn doc(&self) -> Option<DocId> {
        match self {
            CoreEvent::BackgroundColors { doc, .. } | CoreEvent::SaveFinished { doc, .. } => Some(*doc),
            CoreEvent::Diagnostics { .. } | CoreEvent::Redraw => None,
        }
    }
}
