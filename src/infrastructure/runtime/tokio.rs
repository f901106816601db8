use async_trait::async_trait;
use std::time::Duration;

use crate::domain::ports::time_service::TimeService;

/// `TimeService` backed by the tokio timer. Under a paused test runtime the
/// sleeps run on virtual time.
#[derive(Default)]
pub struct TokioTimeService;

impl TokioTimeService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TimeService for TokioTimeService {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
