//! Merging of asynchronous result batches for the current query.
//!
//! Producers answer a query in any number of rounds, and submissions are
//! not debounced, so batches for an abandoned query keep arriving after the
//! user has typed on. Every item carries the query it was computed for; the
//! accumulator keeps only items whose `associated_query` equals the current
//! query text. That filter is the only guard against mixing result lists.

use wox_core::{Query, ResultBatch, ResultItem};

/// What happened to an incoming batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Items merged into the result set.
    pub accepted: usize,
    /// Items dropped because they answer another query.
    pub discarded: usize,
}

impl BatchOutcome {
    /// Whether anything was merged.
    pub fn merged(&self) -> bool {
        self.accepted > 0
    }
}

/// Accumulated, filtered results for the current query.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    current_query: String,
    items: Vec<ResultItem>,
    /// Set on query change, cleared by the first accepted item.
    awaiting_first_batch: bool,
    has_preview: bool,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accumulating for a new query.
    ///
    /// Drops the previous result set and marks the query as unanswered.
    pub fn on_query_changed(&mut self, query: &Query) {
        self.current_query.clone_from(&query.text);
        self.items.clear();
        self.awaiting_first_batch = true;
    }

    /// Merge the items of `batch` that answer the current query.
    ///
    /// Accepted items are appended in arrival order and the whole set is
    /// re-indexed `0..len`. The preview flag is recomputed from the accepted
    /// items of this batch only; a batch with nothing accepted leaves all
    /// state untouched.
    pub fn on_batch_received(&mut self, batch: ResultBatch) -> BatchOutcome {
        let total = batch.items.len();
        let accepted: Vec<ResultItem> = batch
            .items
            .into_iter()
            .filter(|item| item.answers(&self.current_query))
            .collect();

        let outcome = BatchOutcome {
            accepted: accepted.len(),
            discarded: total - accepted.len(),
        };

        if outcome.discarded > 0 {
            tracing::debug!(
                "Discarded {} stale result(s) while querying {:?}",
                outcome.discarded,
                self.current_query
            );
        }

        if !outcome.merged() {
            return outcome;
        }

        self.awaiting_first_batch = false;
        self.has_preview = accepted.iter().any(|item| !item.preview.is_empty());
        self.items.extend(accepted);
        self.reindex();

        tracing::debug!(
            "Merged {} result(s) for {:?}, total {}",
            outcome.accepted,
            self.current_query,
            self.items.len()
        );

        outcome
    }

    /// Drop every result without changing the current query.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.index = index;
        }
    }

    pub fn current_query(&self) -> &str {
        &self.current_query
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the result with the given index.
    pub fn get(&self, index: usize) -> Option<&ResultItem> {
        self.items.get(index)
    }

    /// True until a batch for the current query has been accepted.
    pub fn is_awaiting_first_batch(&self) -> bool {
        self.awaiting_first_batch
    }

    /// Whether the preview pane should be shown.
    pub fn has_preview(&self) -> bool {
        self.has_preview
    }
}
