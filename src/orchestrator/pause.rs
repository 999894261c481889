//! Awaitable pauses
//!
//! The delay between books goes through [`Pause`] so the orchestrator does
//! not care whether the wait is a real timer or a test double.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the caller for a given duration
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real pauses backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
