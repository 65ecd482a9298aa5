//! Timer that clears a stale result list while waiting for a new query.
//!
//! After each submission the previous result list stays on screen for a
//! short while, which avoids flicker when producers answer quickly. If no
//! batch for the new query has been accepted when the timer expires, the
//! query box clears the display instead of showing the old list any longer.
//! Producers that answer later are still merged when they arrive.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::events::{EventSender, LauncherEvent};

/// Cancel-and-replace staleness timer.
///
/// At most one timer is pending. Arming aborts the previous timer, and each
/// expiry carries a generation number so that an expiry that was already
/// queued before the re-arm is recognised as superseded.
#[derive(Debug)]
pub struct StalenessGuard {
    timeout: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl StalenessGuard {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            generation: 0,
            pending: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a new timer, replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, events: &EventSender) -> u64 {
        self.disarm();
        self.generation += 1;

        let generation = self.generation;
        let timeout = self.timeout;
        let events = events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            events.send(LauncherEvent::StaleTimeout { generation });
        }));

        tracing::debug!("Armed staleness timer #{} ({:?})", generation, timeout);
        generation
    }

    /// Cancel the pending timer, if any.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a timer is pending.
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Whether `generation` belongs to the most recent arm.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Record an expiry. Returns false if it was superseded by a later arm.
    pub fn expire(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            tracing::debug!("Ignoring superseded staleness timer #{}", generation);
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for StalenessGuard {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_channel;
    use tokio::time::Instant;

    fn expect_timeout(event: Option<LauncherEvent>) -> u64 {
        match event {
            Some(LauncherEvent::StaleTimeout { generation }) => generation,
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_timeout() {
        let (tx, mut rx) = event_channel();
        let mut guard = StalenessGuard::new(Duration::from_millis(50));

        let start = Instant::now();
        let generation = guard.arm(&tx);
        assert!(guard.is_armed());

        let fired = expect_timeout(rx.recv().await);
        assert_eq!(fired, generation);
        assert_eq!(start.elapsed(), Duration::from_millis(50));
        assert!(guard.expire(fired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending_timer() {
        let (tx, mut rx) = event_channel();
        let mut guard = StalenessGuard::new(Duration::from_millis(50));

        let first = guard.arm(&tx);
        tokio::time::sleep(Duration::from_millis(30)).await;
        let second = guard.arm(&tx);
        assert_ne!(first, second);

        let start = Instant::now();
        assert_eq!(expect_timeout(rx.recv().await), second);
        assert_eq!(start.elapsed(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_expiry_is_rejected() {
        let (tx, _rx) = event_channel();
        let mut guard = StalenessGuard::new(Duration::from_millis(50));

        let first = guard.arm(&tx);
        let second = guard.arm(&tx);
        assert!(!guard.expire(first));
        assert!(guard.expire(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_cancels() {
        let (tx, mut rx) = event_channel();
        let mut guard = StalenessGuard::new(Duration::from_millis(50));

        guard.arm(&tx);
        guard.disarm();
        assert!(!guard.is_armed());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
