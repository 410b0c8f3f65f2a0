//! Long-running job inspection: research tasks and studio artifacts.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::cli::output::{
    create_spinner, label, output_json, print_header, print_hint, print_kv, print_table, truncate,
    OutputMode, SpinnerProgress,
};
use crate::client::NotebookClient;
use crate::init::AppContext;
use crate::mcp::MAX_WAIT_SECS;
use crate::models::{any_in_progress, ResearchPoll};
use crate::poller::{poll_until, PollPolicy};

fn wait_message(what: &str, max_wait: u64) -> String {
    if max_wait == 0 {
        format!("Checking {what}...")
    } else {
        format!("Waiting for {what}...")
    }
}

pub async fn handle_research_status(
    ctx: &AppContext,
    notebook_id: &str,
    interval: u64,
    max_wait: u64,
    mode: OutputMode,
) -> Result<()> {
    let client = ctx.client().await?;
    let client: &NotebookClient = &client;
    let max_wait = max_wait.min(MAX_WAIT_SECS);

    let spinner = create_spinner(&wait_message("research", max_wait));
    let progress = SpinnerProgress::new(spinner.clone());
    let result = poll_until(
        PollPolicy::from_secs(interval, max_wait),
        move || client.poll_research(notebook_id),
        ResearchPoll::is_terminal,
        &progress,
    )
    .await;
    spinner.finish_and_clear();
    let report = result?;

    let task = match report.snapshot {
        ResearchPoll::NotFound => {
            match mode {
                OutputMode::Json => output_json(&json!({ "status": "no_research" })),
                OutputMode::Human => print_hint("No research task found for this notebook."),
            }
            return Ok(());
        }
        ResearchPoll::Task(task) => task,
    };

    match mode {
        OutputMode::Json => output_json(&task),
        OutputMode::Human => {
            print_header(&format!("Research: {}", task.query));
            let status = if task.is_completed() {
                "completed".green().to_string()
            } else {
                "in progress".yellow().to_string()
            };
            print_kv("Status", &status);
            print_kv("Task", &task.task_id);
            print_kv("Source", &task.source_domain.to_string());
            print_kv("Mode", &task.depth.to_string());
            print_kv("Polls", &report.polls.to_string());
            println!();

            let rows = task
                .discovered
                .iter()
                .map(|s| {
                    vec![
                        s.index.to_string(),
                        truncate(&s.title, 50),
                        label(&s.result_kind),
                        truncate(&s.url, 60),
                    ]
                })
                .collect();
            print_table(&["#", "Title", "Kind", "URL"], rows);

            if !task.summary.is_empty() {
                print_header("Summary");
                println!("{}", task.summary);
            }
        }
    }
    Ok(())
}

pub async fn handle_studio_status(
    ctx: &AppContext,
    notebook_id: &str,
    interval: u64,
    max_wait: u64,
    mode: OutputMode,
) -> Result<()> {
    let client = ctx.client().await?;
    let client: &NotebookClient = &client;
    let max_wait = max_wait.min(MAX_WAIT_SECS);

    let spinner = create_spinner(&wait_message("studio artifacts", max_wait));
    let progress = SpinnerProgress::new(spinner.clone());
    let result = poll_until(
        PollPolicy::from_secs(interval, max_wait),
        move || client.poll_studio(notebook_id),
        |artifacts| !any_in_progress(artifacts, None),
        &progress,
    )
    .await;
    spinner.finish_and_clear();
    let artifacts = result?.snapshot;

    match mode {
        OutputMode::Json => output_json(&artifacts),
        OutputMode::Human => {
            let rows = artifacts
                .iter()
                .map(|a| {
                    vec![
                        a.artifact_id.clone(),
                        truncate(&a.title, 40),
                        label(&a.kind),
                        label(&a.status),
                        a.duration_seconds
                            .map(|d| format!("{}:{:02}", d / 60, d % 60))
                            .unwrap_or_default(),
                        a.media_url.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["ID", "Title", "Kind", "Status", "Length", "URL"], rows);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_message_reflects_budget() {
        assert_eq!(wait_message("research", 0), "Checking research...");
        assert_eq!(wait_message("research", 60), "Waiting for research...");
    }
}
