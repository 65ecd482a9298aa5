//! Query box engine for the Wox launcher.
//!
//! This crate reconciles asynchronously delivered results with what the user
//! is typing, including:
//! - ResultAccumulator for filtering and merging batches
//! - StalenessGuard for clearing unanswered queries
//! - WindowedView and SelectionController for the visible rows
//! - ActionDispatcher for default actions
//! - QueryBox, the event loop that owns all of the above
//! - QueryChannel implementations (JSON messages, in-process demo)

pub mod channel;
pub mod demo;
pub mod dispatcher;
pub mod events;
pub mod keymap;
pub mod message;
pub mod model;
pub mod query_box;
pub mod staleness;

// Re-export commonly used types
pub use channel::{BatchSink, QueryChannel};
pub use dispatcher::ActionDispatcher;
pub use events::{event_channel, EventReceiver, EventSender, LauncherEvent};
pub use keymap::{KeyCommand, Keymap};
pub use message::{MessageChannel, MessageType, WoxMessage};
pub use model::{
    BatchOutcome, Direction, ResultAccumulator, SelectionController, Window, WindowedView,
};
pub use query_box::{LauncherSnapshot, QueryBox};
pub use staleness::StalenessGuard;
pub use wox_core::{LauncherConfig, Preview, Query, ResultBatch, ResultItem};
