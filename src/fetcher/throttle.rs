use std::time::Duration;

/// Fixed pause taken before a request. A zero delay never sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDelay {
    delay: Duration,
}

impl RequestDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
