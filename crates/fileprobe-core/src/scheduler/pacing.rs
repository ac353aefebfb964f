//! Pacing gate: a minimum spacing between probe starts, shared by every
//! target of a run (servers rate-limit per client, not per path).

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct PacingGate {
    interval: Duration,
    next: Mutex<Option<Instant>>,
}

impl PacingGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Mutex::new(None),
        }
    }

    /// Waits until at least `interval` has passed since the previous start,
    /// then records a new start and returns its instant. Waiters pass one at a
    /// time (the lock is held while sleeping).
    pub async fn wait(&self) -> Instant {
        if self.interval.is_zero() {
            return Instant::now();
        }
        let mut next = self.next.lock().await;
        if let Some(at) = *next {
            tokio::time::sleep_until(at).await;
        }
        let started = Instant::now();
        *next = Some(started + self.interval);
        started
    }
}
