//! The seam between the query box and result producers.
//!
//! The `QueryChannel` trait is fire-and-forget in both directions. A
//! submitted query may be answered zero or more times, in any order, and
//! answers for an old query may arrive after a newer one was submitted.
//! Nothing is cancelled; the accumulator discards what no longer matches.

use wox_core::{Query, ResultBatch};

use crate::events::{EventSender, LauncherEvent};

// =============================================================================
// Batch Sink
// =============================================================================

/// Callback handle passed along with each submission.
///
/// Producers call [`BatchSink::deliver`] once per batch. Deliveries become
/// `LauncherEvent::BatchReceived` on the query box's event queue.
#[derive(Debug, Clone)]
pub struct BatchSink {
    events: EventSender,
    query: String,
}

impl BatchSink {
    pub fn new(events: EventSender, query: impl Into<String>) -> Self {
        Self {
            events,
            query: query.into(),
        }
    }

    /// Deliver a batch. Returns false if the query box is gone.
    pub fn deliver(&self, batch: impl Into<ResultBatch>) -> bool {
        let batch = batch.into();
        tracing::debug!(
            "Delivering {} result(s) submitted for {:?}",
            batch.len(),
            self.query
        );
        self.events.send(LauncherEvent::BatchReceived(batch))
    }
}

// =============================================================================
// Query Channel Trait
// =============================================================================

/// Transport for queries and action notifications.
///
/// Implementations must not block: `submit` hands the query off and returns,
/// and results come back later through the sink.
#[cfg_attr(test, mockall::automock)]
pub trait QueryChannel: Send + Sync {
    /// Submit a query. `sink` may be invoked any number of times.
    fn submit(&self, query: Query, sink: BatchSink);

    /// Notify the producer that an action was invoked.
    fn send_action(&self, action_id: String);
}

// =============================================================================
// Recording Channel for Testing
// =============================================================================


// =============================================================================
// Tests
// =============================================================================
