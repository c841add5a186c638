//! Synthetic progress ticker.
//!
//! Masks an opaque, non-reporting operation by advancing the displayed
//! percent on a fixed interval. Purely cosmetic: the ticker is capped below
//! its end percent and is cancelled as soon as the real operation resolves.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Default ticker period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Default ticker step in percent.
pub const DEFAULT_TICK_STEP: f64 = 3.0;

/// Errors starting a ticker.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    /// A ticker is already outstanding in this slot.
    #[error("a synthetic progress ticker is already active")]
    AlreadyActive,

    /// `start` was called outside a tokio runtime.
    #[error("no tokio runtime available to drive the progress ticker")]
    NoRuntime,
}

/// Single-slot registry for the synthetic progress ticker.
///
/// At most one ticker is outstanding. [`PollTicker::stop`] guarantees that
/// no tick callback runs after it returns.
#[derive(Debug)]
pub struct PollTicker {
    interval: Duration,
    step: f64,
    slot: Mutex<Option<ActiveTicker>>,
}

#[derive(Debug)]
struct ActiveTicker {
    /// Cleared under lock by `stop`; ticks check it under the same lock.
    live: Arc<Mutex<bool>>,
    token: CancellationToken,
}

impl PollTicker {
    /// Create an idle ticker slot.
    pub fn new(interval: Duration, step: f64) -> Self {
        Self {
            interval,
            step,
            slot: Mutex::new(None),
        }
    }

    /// Start ticking from `start` toward `end`.
    ///
    /// `on_tick` receives each new absolute percent. Values never reach
    /// `end`; once the next step would, the ticker goes quiet and waits for
    /// [`stop`](Self::stop).
    pub fn start<F>(&self, start: f64, end: f64, on_tick: F) -> Result<(), PollError>
    where
        F: Fn(f64) + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| PollError::NoRuntime)?;

        let mut slot = self.slot.lock();
        if slot.is_some() {
            return Err(PollError::AlreadyActive);
        }

        let live = Arc::new(Mutex::new(true));
        let token = CancellationToken::new();

        runtime.spawn(run_ticker(
            self.interval,
            self.step,
            start,
            end,
            Arc::clone(&live),
            token.clone(),
            on_tick,
        ));

        *slot = Some(ActiveTicker { live, token });
        Ok(())
    }

    /// Cancel the outstanding ticker, if any.
    ///
    /// Returns `true` if a ticker was active.
    pub fn stop(&self) -> bool {
        match self.slot.lock().take() {
            Some(active) => {
                *active.live.lock() = false;
                active.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a ticker is outstanding.
    pub fn is_active(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl Default for PollTicker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, DEFAULT_TICK_STEP)
    }
}

impl Drop for PollTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticker<F>(
    period: Duration,
    step: f64,
    start: f64,
    end: f64,
    live: Arc<Mutex<bool>>,
    token: CancellationToken,
    on_tick: F,
) where
    F: Fn(f64) + Send + 'static,
{
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut current = start;
    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            _ = interval.tick() => {
                let next = current + step;
                if next >= end {
                    trace!(current, end, "synthetic progress reached its cap");
                    break;
                }
                if !apply_tick(&live, next, &on_tick) {
                    break;
                }
                current = next;
            }
        }
    }
}

/// Run the callback only while the ticker is still live.
fn apply_tick<F: Fn(f64)>(live: &Mutex<bool>, value: f64, on_tick: &F) -> bool {
    let live = live.lock();
    if !*live {
        return false;
    }
    on_tick(value);
    true
}
