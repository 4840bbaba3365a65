//! Fixed-period batch throttle
//!
//! [`Throttle::limit`] calls a producer once per interval on a background
//! task, starting immediately. The producer is fire-and-forget: it should only
//! enqueue work, the timer never waits for that work to finish. [`Throttle::stop`]
//! prevents further ticks but leaves anything already started running.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub struct Throttle {
    interval_ms: Arc<AtomicU64>,
    ticker: Option<CancellationToken>,
}

impl Throttle {
    /// `interval` must be non-zero.
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero(), "throttle interval must be non-zero");
        Self {
            interval_ms: Arc::new(AtomicU64::new(interval.as_millis() as u64)),
            ticker: None,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.load(Ordering::Relaxed))
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start ticking `produce_batch`. Tick 0 fires without waiting.
    ///
    /// A ticker that is already running is stopped first. Must be called from
    /// within a tokio runtime.
    pub fn limit<F>(&mut self, mut produce_batch: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let interval_ms = Arc::clone(&self.interval_ms);

        tokio::spawn(async move {
            let mut tick: u64 = 0;
            while !cancelled.is_cancelled() {
                trace!(tick, "Throttle tick");
                produce_batch();
                tick += 1;

                // Period is re-read every tick so change_interval applies to the next one
                let period = Duration::from_millis(interval_ms.load(Ordering::Relaxed));
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = tokio::time::sleep(period) => {},
                }
            }
            debug!(ticks = tick, "Throttle stopped");
        });

        self.ticker = Some(token);
    }

    /// Cancel future ticks. Work produced by earlier ticks is not affected.
    pub fn stop(&mut self) {
        if let Some(token) = self.ticker.take() {
            token.cancel();
        }
    }

    /// Change the period used after the currently scheduled tick.
    pub fn change_interval(&self, interval: Duration) {
        debug_assert!(!interval.is_zero(), "throttle interval must be non-zero");
        debug!(interval_ms = interval.as_millis() as u64, "Throttle interval changed");
        self.interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }
}

impl Drop for Throttle {
    fn drop(&mut self) {
        self.stop();
    }
}
