// ABOUTME: Test clocks for health polling.
// ABOUTME: RecordingClock returns instantly; BlockingClock never returns.

use async_trait::async_trait;
use parking_lot::Mutex;
use slick::health::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Records every requested sleep and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}

/// Signals when a sleep begins, then never wakes up.
#[derive(Debug, Default)]
pub struct BlockingClock {
    pub entered: Arc<Notify>,
}

#[async_trait]
impl Clock for BlockingClock {
    async fn sleep(&self, _duration: Duration) {
        self.entered.notify_one();
        std::future::pending::<()>().await;
    }
}
