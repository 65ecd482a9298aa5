//! The query box: single owner of the reconciliation state.
//!
//! `QueryBox` consumes `LauncherEvent`s one at a time and publishes a
//! `LauncherSnapshot` after every transition that changes what should be on
//! screen. Rendering code never touches the state directly; it subscribes to
//! snapshots through `tokio::sync::watch`.
//!
//! ## Display hold
//!
//! A new query clears the accumulated results immediately, but the previous
//! snapshot stays published until either a batch for the new query is
//! merged or the staleness timer expires. Input arriving in between acts on
//! the (empty) new result set and is therefore a no-op.

use std::sync::Arc;

use tokio::sync::watch;
use wox_core::{Preview, Query, QueryConfig, ResultBatch, ResultItem};

use crate::channel::{BatchSink, QueryChannel};
use crate::dispatcher::ActionDispatcher;
use crate::events::{EventReceiver, EventSender, LauncherEvent};
use crate::model::{
    BatchOutcome, Direction, ResultAccumulator, SelectionController, WindowedView,
};
use crate::staleness::StalenessGuard;

// =============================================================================
// Snapshot
// =============================================================================

/// What the rendering layer needs to draw the query box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LauncherSnapshot {
    /// Query the results answer.
    pub query: String,

    /// Visible rows, in order.
    pub items: Vec<ResultItem>,

    /// Active row within `items`.
    pub active_index: Option<usize>,

    /// Absolute index of the first visible row.
    pub window_start: usize,

    /// Number of accumulated results.
    pub total: usize,

    /// Whether to show the preview pane.
    pub has_preview: bool,

    /// Preview of the selected result, empty if nothing is selected.
    pub preview: Preview,
}

impl LauncherSnapshot {
    /// The active row's result.
    pub fn active_item(&self) -> Option<&ResultItem> {
        self.active_index.and_then(|i| self.items.get(i))
    }
}

// =============================================================================
// Query Box
// =============================================================================

pub struct QueryBox {
    accumulator: ResultAccumulator,
    selection: SelectionController,
    staleness: StalenessGuard,
    dispatcher: ActionDispatcher,
    channel: Arc<dyn QueryChannel>,
    events: EventSender,
    tx: watch::Sender<LauncherSnapshot>,
    rx: watch::Receiver<LauncherSnapshot>,
}

impl QueryBox {
    /// Create a query box that submits on `channel` and posts its own
    /// events (batches, timer expiry) to `events`.
    pub fn new(config: &QueryConfig, channel: Arc<dyn QueryChannel>, events: EventSender) -> Self {
        let (tx, rx) = watch::channel(LauncherSnapshot::default());
        Self {
            accumulator: ResultAccumulator::new(),
            selection: SelectionController::new(WindowedView::new(config.shown_item_count)),
            staleness: StalenessGuard::new(config.stale_timeout()),
            dispatcher: ActionDispatcher::new(Arc::clone(&channel)),
            channel,
            events,
            tx,
            rx,
        }
    }

    /// Subscribe to snapshots. The receiver sees the latest one immediately.
    pub fn subscribe(&self) -> watch::Receiver<LauncherSnapshot> {
        self.rx.clone()
    }

    /// Handle for posting events to this query box.
    pub fn events(&self) -> EventSender {
        self.events.clone()
    }

    pub fn accumulator(&self) -> &ResultAccumulator {
        &self.accumulator
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// The result under the cursor.
    pub fn selected(&self) -> Option<&ResultItem> {
        self.selection.resolve_selected(self.accumulator.items())
    }

    // =========================================================================
    // Event Dispatch
    // =========================================================================

    /// Apply one event. Returns false once the loop should stop.
    pub fn handle(&mut self, event: LauncherEvent) -> bool {
        match event {
            LauncherEvent::QueryTextChanged(text) => self.on_query_text_changed(text),
            LauncherEvent::BatchReceived(batch) => {
                self.on_batch_received(batch);
            }
            LauncherEvent::StaleTimeout { generation } => {
                self.on_stale_timeout(generation);
            }
            LauncherEvent::Directional(direction) => {
                self.on_directional(direction);
            }
            LauncherEvent::Wheel { delta_y } => {
                self.on_wheel(delta_y);
            }
            LauncherEvent::Hover(index) => {
                self.on_hover(index);
            }
            LauncherEvent::Activate => {
                self.on_activate();
            }
            LauncherEvent::Click => {
                self.on_click();
            }
            LauncherEvent::Shutdown => return false,
        }
        true
    }

    /// Consume events until `Shutdown` or until every sender is gone.
    pub async fn run(mut self, mut events: EventReceiver) {
        tracing::info!("Query box event loop started");
        while let Some(event) = events.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        self.staleness.disarm();
        tracing::info!("Query box event loop stopped");
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Submit a new query.
    ///
    /// Clears the accumulated results, resets the cursor, re-arms the
    /// staleness timer and hands the query to the channel. Does not publish.
    pub fn on_query_text_changed(&mut self, text: impl Into<String>) {
        let query = Query::text(text);
        tracing::debug!("Query changed to {:?}", query.text);

        self.accumulator.on_query_changed(&query);
        self.selection.reset(0);
        self.staleness.arm(&self.events);

        let sink = BatchSink::new(self.events.clone(), query.text.clone());
        self.channel.submit(query, sink);
    }

    /// Merge a batch and move the cursor back to the top.
    ///
    /// Every delivery resets the cursor, including one whose items were all
    /// discarded. While the display is held for an unanswered query nothing
    /// is published.
    pub fn on_batch_received(&mut self, batch: ResultBatch) -> BatchOutcome {
        let outcome = self.accumulator.on_batch_received(batch);
        if outcome.merged() {
            self.staleness.disarm();
        } else if self.accumulator.is_awaiting_first_batch() || self.selection.cursor() == 0 {
            return outcome;
        }
        self.selection.reset(self.accumulator.len());
        self.publish();
        outcome
    }

    /// Clear the display if the current query is still unanswered.
    ///
    /// Returns whether the display was cleared.
    pub fn on_stale_timeout(&mut self, generation: u64) -> bool {
        if !self.staleness.expire(generation) {
            return false;
        }
        if !self.accumulator.is_awaiting_first_batch() {
            return false;
        }

        tracing::debug!(
            "No results for {:?} after {:?}, clearing",
            self.accumulator.current_query(),
            self.staleness.timeout()
        );
        self.accumulator.clear();
        self.selection.reset(0);
        self.publish();
        true
    }

    /// Move the cursor one row.
    pub fn on_directional(&mut self, direction: Direction) -> bool {
        let moved = self.selection.step(direction, self.accumulator.len());
        if moved {
            self.publish();
        }
        moved
    }

    /// Wheel input, normalised to a directional move.
    pub fn on_wheel(&mut self, delta_y: f32) -> bool {
        match Direction::from_wheel(delta_y) {
            Some(direction) => self.on_directional(direction),
            None => false,
        }
    }

    /// Pointer over the row showing result `index`.
    pub fn on_hover(&mut self, index: usize) -> bool {
        let moved = self.selection.hover(index, self.accumulator.len());
        if moved {
            self.publish();
        }
        moved
    }

    /// Run the default action(s) of the selected result.
    pub fn on_activate(&mut self) -> usize {
        let selected = self.selection.resolve_selected(self.accumulator.items());
        self.dispatcher.activate(selected)
    }

    /// Click on a row. The row is already under the cursor via hover.
    pub fn on_click(&mut self) -> usize {
        self.on_activate()
    }

    // =========================================================================
    // Publishing
    // =========================================================================

    /// Build a snapshot of the current state.
    pub fn snapshot(&self) -> LauncherSnapshot {
        let items = self.accumulator.items();
        let window = self.selection.window();
        LauncherSnapshot {
            query: self.accumulator.current_query().to_string(),
            items: window.slice(items).to_vec(),
            active_index: window.active_index(),
            window_start: window.start(),
            total: items.len(),
            has_preview: self.accumulator.has_preview(),
            preview: self.selection.selected_preview(items),
        }
    }

    fn publish(&self) {
        let _ = self.tx.send(self.snapshot());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::mock::RecordingChannel;
    use crate::events::event_channel;
    use std::time::Duration;
    use wox_core::ResultAction;

    fn results(query: &str, count: usize) -> Vec<ResultItem> {
        (0..count)
            .map(|i| {
                ResultItem::new(format!("{} #{}", query, i), query)
                    .with_action(ResultAction::new(format!("open-{}", i), "Open").default_action())
                    .with_action(ResultAction::new(format!("copy-{}", i), "Copy"))
            })
            .collect()
    }

    fn setup() -> (QueryBox, EventReceiver, RecordingChannel) {
        let channel = RecordingChannel::new();
        let (tx, rx) = event_channel();
        let query_box = QueryBox::new(&QueryConfig::default(), Arc::new(channel.clone()), tx);
        (query_box, rx, channel)
    }

    /// Answer `query` from a producer task after `delay`.
    fn answer_later(sink: BatchSink, delay: Duration, items: Vec<ResultItem>) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sink.deliver(items);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_batch_for_previous_query_is_discarded() {
        let (mut qb, mut rx, channel) = setup();

        qb.on_query_text_changed("xyz");
        qb.on_query_text_changed("abc");
        assert_eq!(channel.submitted_texts(), vec!["xyz", "abc"]);

        answer_later(channel.sink_for("abc").unwrap(), Duration::from_millis(20), results("abc", 3));
        answer_later(channel.sink_for("xyz").unwrap(), Duration::from_millis(30), results("xyz", 2));

        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            qb.handle(event);
        }

        assert_eq!(qb.accumulator().len(), 3);
        assert!(qb
            .accumulator()
            .items()
            .iter()
            .all(|item| item.associated_query == "abc"));

        let snapshot = qb.subscribe().borrow().clone();
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.query, "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_holds_display_until_timeout() {
        let (mut qb, mut rx, channel) = setup();
        let mut snapshots = qb.subscribe();

        qb.on_query_text_changed("a");
        channel.sink_for("a").unwrap().deliver(results("a", 5));
        qb.handle(rx.recv().await.unwrap());
        assert_eq!(snapshots.borrow_and_update().total, 5);

        qb.on_query_text_changed("ab");
        assert!(qb.accumulator().is_empty());
        assert_eq!(qb.selection().cursor(), 0);
        // Old list is still what subscribers see.
        assert!(!snapshots.has_changed().unwrap());

        // Nothing answers "ab": the timer fires and clears the display.
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, LauncherEvent::StaleTimeout { .. }));
        qb.handle(event);

        let snapshot = snapshots.borrow_and_update().clone();
        assert_eq!(snapshot.total, 0);
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.active_index, None);

        // A slow producer still gets merged.
        channel.sink_for("ab").unwrap().deliver(results("ab", 2));
        qb.handle(rx.recv().await.unwrap());
        let snapshot = snapshots.borrow_and_update().clone();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.active_index, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_answer_cancels_staleness_timer() {
        let (mut qb, mut rx, channel) = setup();

        qb.on_query_text_changed("fast");
        answer_later(channel.sink_for("fast").unwrap(), Duration::from_millis(10), results("fast", 1));
        qb.handle(rx.recv().await.unwrap());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(qb.subscribe().borrow().total, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_timeout_does_not_clear() {
        let (mut qb, _rx, channel) = setup();

        qb.on_query_text_changed("a");
        qb.on_query_text_changed("ab");
        assert_eq!(channel.submitted_texts().len(), 2);

        // Generation 1 belongs to the first query and was replaced.
        assert!(!qb.on_stale_timeout(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_slides_window() {
        let (mut qb, _rx, _channel) = setup();
        qb.on_query_text_changed("q");
        qb.on_batch_received(ResultBatch::new(results("q", 25)));

        for _ in 0..12 {
            assert!(qb.handle(LauncherEvent::Directional(Direction::Down)));
        }

        let snapshot = qb.subscribe().borrow().clone();
        assert_eq!(snapshot.window_start, 3);
        assert_eq!(snapshot.items.len(), 10);
        assert_eq!(snapshot.active_index, Some(9));
        assert_eq!(snapshot.active_item().unwrap().index, 12);
        assert_eq!(qb.selected().unwrap().index, 12);

        // Wheel up normalises to a directional move.
        assert!(qb.on_wheel(-1.0));
        assert_eq!(qb.selection().cursor(), 11);
        assert!(!qb.on_wheel(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_batch_resets_cursor() {
        let (mut qb, _rx, _channel) = setup();
        qb.on_query_text_changed("q");
        qb.on_batch_received(ResultBatch::new(results("q", 25)));
        for _ in 0..12 {
            qb.on_directional(Direction::Down);
        }
        assert_eq!(qb.selection().cursor(), 12);

        let mut more = results("q", 1);
        more[0].title = "late".to_string();
        let outcome = qb.on_batch_received(ResultBatch::new(more));
        assert!(outcome.merged());
        assert_eq!(qb.accumulator().get(25).unwrap().title, "late");
        assert_eq!(qb.accumulator().get(25).unwrap().index, 25);

        let snapshot = qb.subscribe().borrow().clone();
        assert_eq!(qb.selection().cursor(), 0);
        assert_eq!(snapshot.window_start, 0);
        assert_eq!(snapshot.items.len(), 10);
        assert_eq!(snapshot.active_index, Some(0));

        // A batch for an older query is dropped but still resets the cursor.
        for _ in 0..12 {
            qb.on_directional(Direction::Down);
        }
        let outcome = qb.on_batch_received(ResultBatch::new(results("old", 3)));
        assert!(!outcome.merged());
        assert_eq!(qb.accumulator().len(), 26);

        let snapshot = qb.subscribe().borrow().clone();
        assert_eq!(qb.selection().cursor(), 0);
        assert_eq!(snapshot.window_start, 0);
        assert_eq!(snapshot.active_index, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_batch_during_hold_keeps_display() {
        let (mut qb, _rx, _channel) = setup();
        let mut snapshots = qb.subscribe();
        qb.on_query_text_changed("a");
        qb.on_batch_received(ResultBatch::new(results("a", 4)));
        snapshots.borrow_and_update();

        qb.on_query_text_changed("ab");
        assert!(!qb.on_batch_received(ResultBatch::new(results("a", 2))).merged());
        assert!(!snapshots.has_changed().unwrap());
        assert!(qb.accumulator().is_awaiting_first_batch());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_resets_scrolled_cursor() {
        let (mut qb, _rx, _channel) = setup();
        qb.on_query_text_changed("q");
        qb.on_batch_received(ResultBatch::new(results("q", 15)));
        for _ in 0..12 {
            qb.on_directional(Direction::Down);
        }
        assert_eq!(qb.selection().cursor(), 12);
        assert_eq!(qb.selection().window().start(), 3);

        qb.on_query_text_changed("qr");
        assert_eq!(qb.selection().cursor(), 0);
        assert!(qb.accumulator().is_empty());
        assert!(qb.selection().window().is_empty());
        assert!(qb.selected().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_activate_sends_default_action() {
        let (mut qb, _rx, channel) = setup();

        // Nothing selected yet.
        assert_eq!(qb.on_activate(), 0);

        qb.on_query_text_changed("q");
        qb.on_batch_received(ResultBatch::new(results("q", 3)));
        qb.on_directional(Direction::Down);

        assert!(qb.handle(LauncherEvent::Activate));
        assert_eq!(channel.sent_actions(), vec!["open-1"]);

        assert!(qb.on_hover(2));
        assert_eq!(qb.on_click(), 1);
        assert_eq!(channel.sent_actions(), vec!["open-1", "open-2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_during_hold_is_ignored() {
        let (mut qb, _rx, channel) = setup();
        qb.on_query_text_changed("a");
        qb.on_batch_received(ResultBatch::new(results("a", 4)));

        qb.on_query_text_changed("ab");
        assert!(!qb.on_hover(2));
        assert!(!qb.on_directional(Direction::Down));
        assert_eq!(qb.on_activate(), 0);
        assert!(channel.sent_actions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_follows_selection() {
        let (mut qb, _rx, _channel) = setup();
        qb.on_query_text_changed("q");
        let items = vec![
            ResultItem::new("plain", "q"),
            ResultItem::new("rich", "q").with_preview(Preview::new("markdown", "# hi")),
        ];
        qb.on_batch_received(ResultBatch::new(items));

        let snapshot = qb.snapshot();
        assert!(snapshot.has_preview);
        assert!(snapshot.preview.is_empty());

        qb.on_directional(Direction::Down);
        assert_eq!(qb.snapshot().preview.preview_type, "markdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_until_shutdown() {
        let channel = RecordingChannel::new();
        let (tx, rx) = event_channel();
        let qb = QueryBox::new(&QueryConfig::default(), Arc::new(channel.clone()), tx.clone());
        let mut snapshots = qb.subscribe();

        let handle = tokio::spawn(qb.run(rx));

        tx.send(LauncherEvent::QueryTextChanged("loop".to_string()));
        let sink = loop {
            if let Some(sink) = channel.sink_for("loop") {
                break sink;
            }
            tokio::task::yield_now().await;
        };
        sink.deliver(results("loop", 2));

        snapshots.changed().await.unwrap();
        assert_eq!(snapshots.borrow().total, 2);

        tx.send(LauncherEvent::Shutdown);
        handle.await.unwrap();
    }
}
