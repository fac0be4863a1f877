// Chunk: docs/chunks/editable_buffer - Main loop state for open documents
// Chunk: docs/chunks/background_completions - Dispatching and draining background work

//! The editor: every open document plus the machinery around them.
//!
//! The `Editor` is the single writer. Commands from the front end go to the
//! active document through [`Editor::execute`]. Background work (saves and
//! large-file coloring) runs on plain threads that only see snapshots, and
//! their results come back through the event channel, applied by
//! [`Editor::drain_events`] on the main loop.
//!
//! Each document keeps its own undo history, so switching files never
//! mixes their edits.
//!
//! At most one background save per document is in flight. Saves requested
//! meanwhile collapse into a single queued snapshot of the newest text,
//! written once the running save reports back, so the last write to land is
//! always the latest dispatched one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use quill_buffer::Motion;
use quill_syntax::{ColorizeJob, Language, SyntaxTheme};

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::EditorConfig;
use crate::core_event::{CoreEvent, DocId};
use crate::document::Document;
use crate::error::EditorError;
use crate::event_channel::{create_event_channel, EventReceiver, EventSender};
use crate::persist::SaveSnapshot;

/// A user action routed to the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(char),
    Backspace,
    Delete,
    Enter,
    Tab,
    Untab,
    ToggleComment,
    SwapLineUp,
    SwapLineDown,
    Cut,
    Copy,
    Paste,
    Duplicate,
    SelectAll,
    Escape,
    Click { row: usize, col: usize },
    DragTo { row: usize, col: usize },
    Move { motion: Motion, extend: bool },
    Undo,
    Redo,
}

/// Called after every committed change with the document's id.
pub type ChangeHook = Box<dyn FnMut(DocId, &Document)>;

struct Slot {
    id: DocId,
    doc: Document,
    save: SaveQueue,
}

#[derive(Debug, Default)]
struct SaveQueue {
    in_flight: bool,
    queued: Option<SaveSnapshot>,
}

pub struct Editor {
    docs: Vec<Slot>,
    active: usize,
    next_id: DocId,
    config: EditorConfig,
    theme: Arc<SyntaxTheme>,
    clipboard: Box<dyn Clipboard>,
    sender: EventSender,
    receiver: EventReceiver,
    hooks: Vec<ChangeHook>,
    needs_redraw: bool,
}

impl Editor {
    /// Creates an editor whose main loop polls for events.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_waker(config, || {})
    }

    /// Creates an editor. `run_loop_waker` is called from background
    /// threads whenever an event is queued.
    pub fn with_waker(config: EditorConfig, run_loop_waker: impl Fn() + Send + Sync + 'static) -> Self {
        let (sender, receiver) = create_event_channel(run_loop_waker);
        Self {
            docs: Vec::new(),
            active: 0,
            next_id: 1,
            config,
            theme: Arc::new(SyntaxTheme::default()),
            clipboard: Box::new(MemoryClipboard::new()),
            sender,
            receiver,
            hooks: Vec::new(),
            needs_redraw: false,
        }
    }

    /// Replaces the clipboard, e.g. with one backed by the terminal.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    pub fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// A sender for external producers such as a language client.
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Registers a hook fired after every committed change.
    pub fn on_change(&mut self, hook: impl FnMut(DocId, &Document) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    // ==================== Documents ====================

    /// Opens `path`, or switches to it if it is already open.
    pub fn open(&mut self, path: &Path) -> Result<DocId, EditorError> {
        if let Some(index) = self.index_of_path(path) {
            self.active = index;
            self.needs_redraw = true;
            return Ok(self.docs[index].id);
        }
        let mut doc = Document::open_with_theme(path, &self.config, Arc::clone(&self.theme))?;
        let id = self.alloc_id();
        if let Some(job) = doc.take_colorize_job() {
            spawn_colorize(&self.sender, id, job);
        }
        self.push(id, doc);
        Ok(id)
    }

    /// Creates an unsaved document and makes it active.
    pub fn new_document(&mut self, text: &str, language: Language) -> DocId {
        let mut doc = Document::with_config(text, language, &self.config, Arc::clone(&self.theme));
        let id = self.alloc_id();
        if let Some(job) = doc.take_colorize_job() {
            spawn_colorize(&self.sender, id, job);
        }
        self.push(id, doc);
        id
    }

    fn alloc_id(&mut self) -> DocId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, id: DocId, doc: Document) {
        self.docs.push(Slot {
            id,
            doc,
            save: SaveQueue::default(),
        });
        self.active = self.docs.len() - 1;
        self.needs_redraw = true;
    }

    fn index_of(&self, id: DocId) -> Option<usize> {
        self.docs.iter().position(|s| s.id == id)
    }

    fn index_of_path(&self, path: &Path) -> Option<usize> {
        self.docs.iter().position(|s| s.doc.path() == Some(path))
    }

    /// Makes `id` the active document. Returns false if it is not open.
    pub fn switch_to(&mut self, id: DocId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.active = index;
                self.needs_redraw = true;
                true
            }
            None => false,
        }
    }

    /// Closes `id`. Returns the document, which may have unsaved changes.
    pub fn close(&mut self, id: DocId) -> Option<Document> {
        let index = self.index_of(id)?;
        let slot = self.docs.remove(index);
        if self.active >= self.docs.len() {
            self.active = self.docs.len().saturating_sub(1);
        } else if index < self.active {
            self.active -= 1;
        }
        self.needs_redraw = true;
        Some(slot.doc)
    }

    pub fn document_count(&self) -> usize {
        self.docs.len()
    }

    pub fn active_id(&self) -> Option<DocId> {
        self.docs.get(self.active).map(|s| s.id)
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.docs.get(self.active).map(|s| &s.doc)
    }

    pub fn active_document_mut(&mut self) -> Option<&mut Document> {
        self.docs.get_mut(self.active).map(|s| &mut s.doc)
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.docs.iter().find(|s| s.id == id).map(|s| &s.doc)
    }

    pub fn document_ids(&self) -> Vec<DocId> {
        self.docs.iter().map(|s| s.id).collect()
    }

    // ==================== Commands ====================

    /// Runs `command` on the active document. Returns true if the content
    /// changed.
    pub fn execute(&mut self, command: Command) -> bool {
        let Some(slot) = self.docs.get_mut(self.active) else {
            return false;
        };
        let doc = &mut slot.doc;
        let before = doc.version();
        match command {
            Command::Insert(ch) => {
                doc.add_char(ch);
            }
            Command::Backspace => {
                doc.backspace();
            }
            Command::Delete => {
                doc.delete_forward();
            }
            Command::Enter => {
                doc.enter();
            }
            Command::Tab => {
                doc.tab();
            }
            Command::Untab => {
                doc.untab();
            }
            Command::ToggleComment => {
                doc.toggle_comment();
            }
            Command::SwapLineUp => {
                doc.swap_line_up();
            }
            Command::SwapLineDown => {
                doc.swap_line_down();
            }
            Command::Cut => {
                doc.cut(self.clipboard.as_mut());
            }
            Command::Copy => {
                doc.copy(self.clipboard.as_mut());
            }
            Command::Paste => {
                doc.paste(self.clipboard.as_ref());
            }
            Command::Duplicate => {
                doc.duplicate();
            }
            Command::SelectAll => doc.select_all(),
            Command::Escape => {
                doc.escape();
            }
            Command::Click { row, col } => doc.click(row, col),
            Command::DragTo { row, col } => doc.drag_to(row, col),
            Command::Move { motion, extend } => doc.move_cursor(motion, extend),
            Command::Undo => {
                doc.undo();
            }
            Command::Redo => {
                doc.redo();
            }
        }
        self.needs_redraw = true;

        let changed = slot.doc.version() != before;
        if changed {
            let id = slot.id;
            self.after_change(id);
        }
        changed
    }

    /// Fires change hooks and dispatches an autosave for a small file.
    fn after_change(&mut self, id: DocId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let slot = &mut self.docs[index];
        for hook in &mut self.hooks {
            hook(id, &slot.doc);
        }
        if let Some(snapshot) = slot.doc.save_snapshot(id) {
            if snapshot.text.len() <= self.config.autosave_max_bytes {
                dispatch_save(&self.sender, slot, snapshot);
            } else {
                debug!("{} is too large to autosave", snapshot.path.display());
            }
        }
    }

    /// Saves the active document synchronously.
    pub fn save_active(&mut self) -> Result<(), EditorError> {
        let slot = self.docs.get_mut(self.active).ok_or(EditorError::NoPath)?;
        slot.doc.save()?;
        // A background save still running would land after this write;
        // queue the current text to follow it.
        if slot.save.in_flight {
            slot.save.queued = slot.doc.save_snapshot(slot.id);
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Returns true while a background save of `id` is running or queued.
    pub fn is_saving(&self, id: DocId) -> bool {
        self.docs
            .iter()
            .find(|s| s.id == id)
            .is_some_and(|s| s.save.in_flight || s.save.queued.is_some())
    }

    // ==================== Events ====================

    /// Applies every queued background event. Returns how many were handled.
    pub fn drain_events(&mut self) -> usize {
        let events: Vec<CoreEvent> = self.receiver.drain().collect();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// Blocks up to `timeout` for one event, then drains the rest.
    pub fn wait_events(&mut self, timeout: Duration) -> usize {
        match self.receiver.recv_timeout(timeout) {
            Some(event) => {
                self.handle_event(event);
                1 + self.drain_events()
            }
            None => 0,
        }
    }

    fn handle_event(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::BackgroundColors { doc, result } => {
                let Some(slot) = self.docs.iter_mut().find(|s| s.id == doc) else {
                    return;
                };
                if slot.doc.install_colors(result) {
                    self.needs_redraw = true;
                } else if let Some(job) = slot.doc.colorize_job() {
                    spawn_colorize(&self.sender, doc, job);
                }
            }
            CoreEvent::SaveFinished { doc, version, error } => {
                let Some(slot) = self.docs.iter_mut().find(|s| s.id == doc) else {
                    return;
                };
                slot.save.in_flight = false;
                match error {
                    None => slot.doc.mark_saved(version),
                    Some(e) => warn!("background save failed: {e}"),
                }
                if let Some(next) = slot.save.queued.take() {
                    dispatch_save(&self.sender, slot, next);
                }
                self.needs_redraw = true;
            }
            CoreEvent::Diagnostics { path, diagnostics } => {
                if let Some(slot) = self.docs.iter_mut().find(|s| s.doc.path() == Some(path.as_path())) {
                    slot.doc.set_diagnostics(diagnostics);
                    self.needs_redraw = true;
                }
            }
            CoreEvent::Redraw => {
                self.sender.clear_redraw_pending();
                self.needs_redraw = true;
            }
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Returns whether a redraw was requested and clears the request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Paths of documents with unsaved changes.
    pub fn dirty_paths(&self) -> Vec<PathBuf> {
        self.docs
            .iter()
            .filter(|s| s.doc.is_dirty())
            .filter_map(|s| s.doc.path().map(Path::to_path_buf))
            .collect()
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("documents", &self.docs.len())
            .field("active", &self.active_id())
            .field("needs_redraw", &self.needs_redraw)
            .finish()
    }
}

/// Runs a full coloring pass on its own thread.
fn spawn_colorize(sender: &EventSender, doc: DocId, job: ColorizeJob) {
    let sender = sender.clone();
    let spawned = thread::Builder::new()
        .name("quill-colorize".into())
        .spawn(move || {
            let result = job.run();
            // The receiver is gone only during shutdown.
            let _ = sender.send_colors(doc, result);
            let _ = sender.request_redraw();
        });
    if let Err(e) = spawned {
        warn!("could not start background coloring: {e}");
    }
}

/// Starts a background save for `slot`, or queues `snapshot` behind the one
/// already running. A queued snapshot replaces any older queued one.
fn dispatch_save(sender: &EventSender, slot: &mut Slot, snapshot: SaveSnapshot) {
    if slot.save.in_flight {
        slot.save.queued = Some(snapshot);
        return;
    }
    slot.save.in_flight = spawn_save(sender, snapshot);
}

/// Writes a snapshot on its own thread. Returns false if no thread started.
fn spawn_save(sender: &EventSender, snapshot: SaveSnapshot) -> bool {
    let sender = sender.clone();
    let spawned = thread::Builder::new()
        .name("quill-save".into())
        .spawn(move || {
            let error = snapshot.write().err().map(|e| e.to_string());
            let _ = sender.send_save_finished(snapshot.doc_id, snapshot.version, error);
            let _ = sender.request_redraw();
        });
    match spawned {
        Ok(_) => true,
        Err(e) => {
            warn!("could not start background save: {e}");
            false
        }
    }
}
