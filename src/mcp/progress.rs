//! Poll progress over MCP.
//!
//! `research_status` and `studio_status` wait on server-side jobs. While they
//! wait, each poll is forwarded to the client as `notifications/progress`,
//! measured in elapsed seconds against the wait budget.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{Meta, ProgressNotificationParam, ProgressToken};
use rmcp::{Peer, RoleServer};
use tracing::debug;

use crate::progress::{noop_progress, ProgressReporter};

/// Which job a poll belongs to, used as the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollJob {
    Research,
    Studio,
}

impl PollJob {
    fn label(self) -> &'static str {
        match self {
            PollJob::Research => "Research",
            PollJob::Studio => "Studio",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PollUpdate {
    progress: f64,
    total: Option<f64>,
    message: String,
}

/// A zero budget means a single poll, which has no meaningful total.
fn poll_update(job: PollJob, elapsed: f64, budget: f64, message: Option<String>) -> PollUpdate {
    let detail = message.unwrap_or_else(|| "waiting".to_string());
    PollUpdate {
        progress: elapsed,
        total: (budget > 0.0).then_some(budget),
        message: format!("{}: {detail}", job.label()),
    }
}

pub struct PollProgressNotifier {
    client: Peer<RoleServer>,
    token: ProgressToken,
    job: PollJob,
}

#[async_trait]
impl ProgressReporter for PollProgressNotifier {
    async fn report(&self, current: f64, total: f64, message: Option<String>) {
        let update = poll_update(self.job, current, total, message);
        let sent = self
            .client
            .notify_progress(ProgressNotificationParam {
                progress_token: self.token.clone(),
                progress: update.progress,
                total: update.total,
                message: Some(update.message),
            })
            .await;
        if let Err(e) = sent {
            debug!("Dropped {} poll notification: {}", self.job.label(), e);
        }
    }
}

/// Notifier for a polling tool call; a noop when the request carries no progress token.
pub fn make_mcp_progress(
    meta: &Meta,
    client: &Peer<RoleServer>,
    job: PollJob,
) -> Arc<dyn ProgressReporter> {
    match meta.get_progress_token() {
        Some(token) => Arc::new(PollProgressNotifier {
            client: client.clone(),
            token: token.clone(),
            job,
        }),
        None => noop_progress(),
    }
}
