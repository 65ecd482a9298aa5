//! Default action dispatch for the selected result.

use std::sync::Arc;

use wox_core::ResultItem;

use crate::channel::QueryChannel;

/// Sends the default actions of a result to the query channel.
pub struct ActionDispatcher {
    channel: Arc<dyn QueryChannel>,
}

impl ActionDispatcher {
    pub fn new(channel: Arc<dyn QueryChannel>) -> Self {
        Self { channel }
    }

    /// Send every action flagged as default on `selected`.
    ///
    /// Producers normally flag exactly one, but all flagged actions are sent
    /// in declaration order. Returns the number of actions sent; nothing
    /// selected is a no-op.
    pub fn activate(&self, selected: Option<&ResultItem>) -> usize {
        let Some(item) = selected else {
            tracing::debug!("Activate with nothing selected");
            return 0;
        };

        let mut sent = 0;
        for action in item.default_actions() {
            tracing::debug!("Sending default action {:?} for {:?}", action.id, item.title);
            self.channel.send_action(action.id.clone());
            sent += 1;
        }

        if sent == 0 {
            tracing::debug!("Result {:?} has no default action", item.title);
        }
        sent
    }
}
