//! Progress reporting for long-running polls.
//!
//! The poller reports once per round trip. MCP tools forward reports as
//! progress notifications, the CLI drives a spinner, and everything else
//! uses [`NoopProgressReporter`].

use std::sync::Arc;

use async_trait::async_trait;

/// Receives progress while a server-side job is being polled.
///
/// `current` and `total` are seconds waited and the wait budget; a zero
/// budget means a single poll.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// Fire-and-forget; implementations never fail the caller.
    async fn report(&self, current: f64, total: f64, message: Option<String>);
}

pub struct NoopProgressReporter;

#[async_trait]
impl ProgressReporter for NoopProgressReporter {
    async fn report(&self, _current: f64, _total: f64, _message: Option<String>) {}
}

pub fn noop_progress() -> Arc<dyn ProgressReporter> {
    Arc::new(NoopProgressReporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_progress_accepts_reports() {
        let reporter = noop_progress();
        reporter.report(0.0, 300.0, None).await;
        reporter.report(30.0, 300.0, Some("poll 2".into())).await;
    }
}
