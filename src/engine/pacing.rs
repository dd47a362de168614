// * Request pacing
// * A fixed pause after each network request; cache hits never pay for it.

use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    // * A pacer that never sleeps
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_disabled(&self) -> bool {
        self.delay.is_zero()
    }

    // * Sleeps for the configured delay
    pub async fn pause(&self) {
        if self.is_disabled() {
            return;
        }
        debug!(delay_ms = self.delay.as_millis() as u64, "Pacing before next request");
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::from_millis(crate::config::constants::DOWNLOAD_PACING_MS)
    }
}
