// src/utils/throttle.rs
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Minimum spacing between outbound calls, measured on the monotonic clock.
/// Call `wait` before a live request and `mark` once it has returned.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    pub async fn wait(&self) {
        if let Some(prev) = self.last_call {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
    }

    pub fn mark(&mut self) {
        self.last_call = Some(Instant::now());
    }
}
