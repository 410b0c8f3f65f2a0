//! Research tasks: server-side jobs that discover candidate sources.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::codes::{ResearchDepth, ResearchSource, ResearchStatus, ResultKind};

/// Returned when a research task has been started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchHandle {
    pub task_id: String,
    pub report_id: Option<String>,
    pub notebook_id: String,
    pub query: String,
    pub source: ResearchSource,
    pub depth: ResearchDepth,
}

/// A candidate source found by a research task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiscoveredSource {
    /// Position in the task's discovery list; stable across polls.
    pub index: usize,
    pub url: String,
    pub title: String,
    pub description: String,
    pub result_kind: ResultKind,
}

impl DiscoveredSource {
    /// Drive document id embedded as `id=` in a Drive result URL.
    pub fn drive_doc_id(&self) -> Option<&str> {
        let (_, tail) = self.url.rsplit_once("id=")?;
        let id = tail.split('&').next().unwrap_or(tail);
        (!id.is_empty()).then_some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchTask {
    pub task_id: String,
    pub status: ResearchStatus,
    pub query: String,
    pub source_domain: ResearchSource,
    pub depth: ResearchDepth,
    pub discovered: Vec<DiscoveredSource>,
    pub summary: String,
}

impl ResearchTask {
    pub fn is_completed(&self) -> bool {
        self.status == ResearchStatus::Completed
    }
}

/// Snapshot of a notebook's research activity.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchPoll {
    /// The notebook has no research task.
    NotFound,
    Task(ResearchTask),
}

impl ResearchPoll {
    /// No further polling can change the outcome.
    pub fn is_terminal(&self) -> bool {
        match self {
            ResearchPoll::NotFound => true,
            ResearchPoll::Task(task) => task.is_completed(),
        }
    }
}
