//! Single-slot debounce timer.
//!
//! [`Debouncer::arm`] replaces whatever is pending, so at most one fire is
//! ever scheduled. [`Debouncer::fired`] is cancel-safe: dropping it (for
//! example as a losing `select!` branch) leaves the pending value in place.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Collapses bursts of values into the last one, delivered after a quiet
/// period.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire after the quiet period, cancelling any
    /// pending fire.
    pub fn arm(&mut self, value: T) {
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.delay,
        });
    }

    /// Cancel the pending fire, returning its value.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending value to fire. Never completes while nothing is
    /// armed.
    pub async fn fired(&mut self) -> T {
        loop {
            match self.pending.take() {
                Some(p) if Instant::now() >= p.deadline => return p.value,
                Some(p) => {
                    let deadline = p.deadline;
                    self.pending = Some(p);
                    sleep_until(deadline).await;
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}
