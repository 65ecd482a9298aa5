//! Events driving the query box.
//!
//! Every state transition starts as a `LauncherEvent` on a single
//! `tokio::sync::mpsc` queue: user input, batch deliveries from the query
//! channel and staleness timer expiry all go through the same queue, so the
//! state is only ever touched by the task consuming it.

use tokio::sync::mpsc;
use wox_core::ResultBatch;

use crate::model::Direction;

/// All events handled by the query box.
#[derive(Debug, Clone)]
pub enum LauncherEvent {
    /// The text in the query box changed.
    QueryTextChanged(String),
    /// The query channel delivered a batch.
    BatchReceived(ResultBatch),
    /// A staleness timer expired.
    StaleTimeout { generation: u64 },
    /// Arrow key or equivalent binding.
    Directional(Direction),
    /// Mouse wheel, positive delta scrolls down.
    Wheel { delta_y: f32 },
    /// Pointer over the row with this absolute index.
    Hover(usize),
    /// Enter or equivalent binding.
    Activate,
    /// Click on a row.
    Click,
    /// Stop the event loop.
    Shutdown,
}

/// Cloneable handle for posting events to the query box.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<LauncherEvent>,
}

impl EventSender {
    /// Post an event. Returns false if the query box has shut down.
    pub fn send(&self, event: LauncherEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving end, consumed by `QueryBox::run`.
pub type EventReceiver = mpsc::UnboundedReceiver<LauncherEvent>;

/// Create the event queue.
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}
