//! Research tools: start a discovery task, wait on it, import its results.

use std::sync::Arc;

use crate::client::{validate_research, NotebookClient};
use crate::mcp::error::ToolError;
use crate::mcp::types::{
    ResearchImportInput, ResearchImportResponse, ResearchReport, ResearchStartInput,
    ResearchStartResponse, ResearchState, ResearchStatusInput, ResearchStatusResponse,
    ToolStatus, MAX_WAIT_SECS,
};
use crate::mcp::NblmServer;
use crate::models::{
    notebook_url, DiscoveredSource, ResearchDepth, ResearchPoll, ResearchSource,
};
use crate::poller::{poll_until, PollPolicy, PollReport};
use crate::progress::ProgressReporter;

/// Characters of the query used in a generated notebook title.
const TITLE_QUERY_CHARS: usize = 50;

fn research_title(query: &str) -> String {
    let head: String = query.chars().take(TITLE_QUERY_CHARS).collect();
    format!("Research: {head}")
}

fn started_message(depth: ResearchDepth) -> &'static str {
    match depth {
        ResearchDepth::Deep => {
            "Deep Research started. This takes 3-5 minutes. Call research_status to check progress."
        }
        ResearchDepth::Fast => {
            "Fast Research started. This takes about 30 seconds. Call research_status to check progress."
        }
    }
}

fn research_report(report: PollReport<ResearchPoll>) -> ResearchReport {
    let polls_made = report.polls;
    let wait_time_seconds = report.elapsed_secs();
    let finished = report.finished;

    match report.snapshot {
        ResearchPoll::NotFound => ResearchReport {
            status: ResearchState::NoResearch,
            task_id: None,
            query: None,
            source_domain: None,
            mode: None,
            source_count: 0,
            sources: Vec::new(),
            summary: String::new(),
            polls_made,
            wait_time_seconds,
            message: None,
        },
        ResearchPoll::Task(task) => ResearchReport {
            status: if task.is_completed() {
                ResearchState::Completed
            } else {
                ResearchState::InProgress
            },
            message: (!finished).then(|| {
                format!(
                    "Research still in progress after {wait_time_seconds}s. Call research_status again to continue waiting."
                )
            }),
            task_id: Some(task.task_id),
            query: Some(task.query),
            source_domain: Some(task.source_domain),
            mode: Some(task.depth),
            source_count: task.discovered.len(),
            sources: task.discovered,
            summary: task.summary,
            polls_made,
            wait_time_seconds,
        },
    }
}

/// Pick sources by their discovery index; unknown indices are an error.
fn select_sources(
    discovered: &[DiscoveredSource],
    indices: Option<&[usize]>,
) -> Result<Vec<DiscoveredSource>, ToolError> {
    let Some(indices) = indices else {
        return Ok(discovered.to_vec());
    };

    let mut selected = Vec::with_capacity(indices.len());
    let mut invalid = Vec::new();
    for &idx in indices {
        match discovered.iter().find(|s| s.index == idx) {
            Some(source) => selected.push(source.clone()),
            None => invalid.push(idx),
        }
    }

    if !invalid.is_empty() {
        let max = discovered.iter().map(|s| s.index).max().unwrap_or(0);
        return Err(ToolError::invalid(
            format!("Invalid source indices: {invalid:?}. Valid range is 0-{max}."),
            "Use the index values listed by research_status.",
        ));
    }
    Ok(selected)
}

impl NblmServer {
    pub async fn handle_research_start(
        &self,
        input: ResearchStartInput,
    ) -> Result<ResearchStartResponse, ToolError> {
        let source: ResearchSource = match input.source.as_deref() {
            Some(name) => name.parse()?,
            None => ResearchSource::default(),
        };
        let depth: ResearchDepth = match input.mode.as_deref() {
            Some(name) => name.parse()?,
            None => ResearchDepth::default(),
        };
        validate_research(source, depth)?;

        let client = self.client().await?;
        let (notebook_id, created_notebook) = match input.notebook_id {
            Some(id) => (id, false),
            None => {
                let title = input.title.unwrap_or_else(|| research_title(&input.query));
                let notebook = client
                    .create_notebook(&title)
                    .await?
                    .ok_or_else(|| ToolError::failed("Failed to create notebook"))?;
                (notebook.id, true)
            }
        };

        let handle = client
            .start_research(&notebook_id, &input.query, source, depth)
            .await?
            .ok_or_else(|| ToolError::failed("Failed to start research"))?;

        Ok(ResearchStartResponse {
            status: ToolStatus::Success,
            task_id: handle.task_id,
            notebook_url: notebook_url(&notebook_id),
            notebook_id,
            query: input.query,
            source: handle.source,
            mode: handle.depth,
            created_notebook,
            message: started_message(handle.depth).to_string(),
        })
    }

    /// Poll until the task completes, none exists, or the wait budget runs out.
    pub async fn handle_research_status(
        &self,
        input: ResearchStatusInput,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<ResearchStatusResponse, ToolError> {
        let config = &self.ctx.config;
        let policy = PollPolicy::from_secs(
            input
                .poll_interval
                .unwrap_or(config.research_poll_interval_secs),
            input
                .max_wait
                .unwrap_or(config.research_max_wait_secs)
                .min(MAX_WAIT_SECS),
        );

        let client = self.client().await?;
        let client: &NotebookClient = &client;
        let notebook_id = input.notebook_id.as_str();

        let report = poll_until(
            policy,
            move || client.poll_research(notebook_id),
            ResearchPoll::is_terminal,
            progress.as_ref(),
        )
        .await?;

        Ok(ResearchStatusResponse {
            status: ToolStatus::Success,
            research: research_report(report),
        })
    }

    pub async fn handle_research_import(
        &self,
        input: ResearchImportInput,
    ) -> Result<ResearchImportResponse, ToolError> {
        let client = self.client().await?;

        let task = match client.poll_research(&input.notebook_id).await? {
            ResearchPoll::NotFound => {
                return Err(ToolError::not_found(
                    "No research found for this notebook.",
                    "Run research_start first.",
                ))
            }
            ResearchPoll::Task(task) => task,
        };
        if !task.is_completed() {
            return Err(ToolError::not_ready(
                "Research is still in progress (status: in_progress). Wait for completion before importing.",
                "Call research_status until the research status is completed.",
            ));
        }
        if task.discovered.is_empty() {
            return Err(ToolError::not_found(
                "No sources found in research results.",
                "Start a new research task with a broader query.",
            ));
        }

        let selected = select_sources(&task.discovered, input.source_indices.as_deref())?;
        let imported = client
            .import_research_sources(&input.notebook_id, &input.task_id, &selected)
            .await?;

        Ok(ResearchImportResponse {
            status: ToolStatus::Success,
            imported_count: imported.len(),
            total_available: task.discovered.len(),
            sources: imported,
            notebook_url: notebook_url(&input.notebook_id),
        })
    }
}
