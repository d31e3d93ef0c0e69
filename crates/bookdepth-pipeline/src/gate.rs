//! Coalescing recompute gate.
//!
//! Any number of rapid upstream changes collapse into one pending
//! recomputation; `ready()` resolves at most once per interval and only
//! when something changed. A recomputation that follows always reads the
//! inputs as they are at that moment, never a stale intermediate state.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::trace;

pub struct RecomputeGate {
    dirty: AtomicBool,
    notify: Notify,
    min_interval: Duration,
    last_run: Mutex<Option<Instant>>,
}

impl RecomputeGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            dirty: AtomicBool::new(false),
            notify: Notify::new(),
            min_interval,
            last_run: Mutex::new(None),
        }
    }

    /// Record that the inputs changed. Cheap, callable from the ingestion
    /// path on every frame.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Wait until a recomputation is due: inputs are dirty and at least
    /// `min_interval` has passed since the previous one.
    pub async fn ready(&self) {
        loop {
            if self.dirty.swap(false, Ordering::SeqCst) {
                let wait = {
                    let last = self.last_run.lock();
                    last.map(|at| {
                        self.min_interval
                            .saturating_sub(at.elapsed())
                    })
                    .unwrap_or(Duration::ZERO)
                };
                if !wait.is_zero() {
                    trace!(wait_ms = wait.as_millis() as u64, "Throttling recompute");
                    tokio::time::sleep(wait).await;
                }
                *self.last_run.lock() = Some(Instant::now());
                return;
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ready_requires_dirty() {
        let gate = RecomputeGate::new(Duration::from_millis(250));

        // Nothing marked: ready() must still be pending after a timeout.
        let pending =
            tokio::time::timeout(Duration::from_secs(1), gate.ready()).await;
        assert!(pending.is_err());

        gate.mark_dirty();
        tokio::time::timeout(Duration::from_secs(1), gate.ready())
            .await
            .expect("ready after mark_dirty");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_marks_coalesce() {
        let gate = RecomputeGate::new(Duration::from_millis(250));

        for _ in 0..10 {
            gate.mark_dirty();
        }
        tokio::time::timeout(Duration::from_secs(1), gate.ready())
            .await
            .expect("one recompute due");

        // All ten marks were claimed by the single recompute.
        let pending =
            tokio::time::timeout(Duration::from_secs(1), gate.ready()).await;
        assert!(pending.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recomputes_spaced_by_interval() {
        let gate = RecomputeGate::new(Duration::from_millis(250));

        gate.mark_dirty();
        gate.ready().await;
        let first = Instant::now();

        gate.mark_dirty();
        gate.ready().await;
        assert!(Instant::now() - first >= Duration::from_millis(250));
    }
}
