// Chunk: docs/chunks/clipboard_operations - Cut, copy and paste
//!
//! Clipboard seam.
//!
//! The system clipboard belongs to the embedding terminal front end, so
//! edit operations talk to a [`Clipboard`] trait object. It is intentionally
//! minimal: all cut/copy/paste logic stays in the document.

/// Somewhere cut and copied text goes.
pub trait Clipboard {
    /// Replaces the clipboard contents.
    fn set_text(&mut self, text: String);

    /// Returns the current contents, if they are text.
    fn text(&self) -> Option<String>;
}

/// A process-local clipboard, used when no system clipboard is wired in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: String) {
        self.contents = Some(text);
    }

    fn text(&self) -> Option<String> {
        self.contents.clone()
    }
}
