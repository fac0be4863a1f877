// Chunk: docs/chunks/background_completions - Completion queue for background work
//! Event channel between background threads and the main loop.
//!
//! Save tasks and large-file coloring jobs run on their own threads and send
//! their results through this channel. A single receiver, owned by the
//! `Editor`, drains them on the main loop.
//!
//! The channel is unbounded; a finishing task never blocks on send. The sender also holds a callback for waking the front end's run loop.
//! Redraw requests are debounced so a flood of completions produces a single
//! pending `Redraw` event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, SendError, Sender};
use quill_syntax::ColorizeResult;

use crate::core_event::{CoreEvent, DocId};
use crate::diagnostics::Diagnostic;

/// Sender half of the event channel.
///
/// Cloneable and `Send`; each background task gets its own clone.
#[derive(Clone)]
pub struct EventSender {
    inner: Arc<EventSenderInner>,
}

struct EventSenderInner {
    sender: Sender<CoreEvent>,
    /// Callback to wake the run loop (called after every send)
    run_loop_waker: Box<dyn Fn() + Send + Sync>,
    /// Whether a redraw is already pending (debouncing)
    redraw_pending: AtomicBool,
}

/// Receiver half of the event channel. Stays with the main loop.
pub struct EventReceiver {
    receiver: Receiver<CoreEvent>,
}

/// Creates a new event channel pair.
///
/// `run_loop_waker` is called after each send so a front end blocked on
/// input can come back and drain the channel. Pass `|| {}` when the main
/// loop polls.
pub fn create_event_channel(run_loop_waker: impl Fn() + Send + Sync + 'static) -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();

    let event_sender = EventSender {
        inner: Arc::new(EventSenderInner {
            sender,
            run_loop_waker: Box::new(run_loop_waker),
            redraw_pending: AtomicBool::new(false),
        }),
    };

    (event_sender, EventReceiver { receiver })
}

impl EventSender {
    fn send(&self, event: CoreEvent) -> Result<(), SendError<CoreEvent>> {
        let result = self.inner.sender.send(event);
        (self.inner.run_loop_waker)();
        result
    }

    /// Delivers a finished background coloring pass.
    pub fn send_colors(&self, doc: DocId, result: ColorizeResult) -> Result<(), SendError<CoreEvent>> {
        self.send(CoreEvent::BackgroundColors { doc, result })
    }

    /// Reports the outcome of a background save.
    pub fn send_save_finished(
        &self,
        doc: DocId,
        version: u64,
        error: Option<String>,
    ) -> Result<(), SendError<CoreEvent>> {
        self.send(CoreEvent::SaveFinished { doc, version, error })
    }

    /// Delivers diagnostics for a file.
    pub fn send_diagnostics(
        &self,
        path: std::path::PathBuf,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<(), SendError<CoreEvent>> {
        self.send(CoreEvent::Diagnostics { path, diagnostics })
    }

    /// Requests a redraw.
    ///
    /// If a redraw is already pending, the send is skipped.
    pub fn request_redraw(&self) -> Result<(), SendError<CoreEvent>> {
        if self.inner.redraw_pending.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.send(CoreEvent::Redraw)
    }

    /// Clears the redraw pending flag.
    ///
    /// Called by the main loop after it consumes a `Redraw` event.
    pub fn clear_redraw_pending(&self) {
        self.inner.redraw_pending.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for EventSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSender")
            .field("redraw_pending", &self.inner.redraw_pending.load(Ordering::SeqCst))
            .finish()
    }
}

impl EventReceiver {
    /// Attempts to receive an event without blocking.
    pub fn try_recv(&self) -> Option<CoreEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<CoreEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drains every event currently in the channel without blocking.
    pub fn drain(&self) -> impl Iterator<Item = CoreEvent> + '_ {
        std::iter::from_fn(|| self.try_recv())
    }
}

impl std::fmt::Debug for EventReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventReceiver")
            .field("queued", &self.receiver.len())
            .finish()
    }
}
