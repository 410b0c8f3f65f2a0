//! Notebook commands: catalog listing, raw record, sources, questions.

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;

use crate::cli::output::{
    label, output_json, print_header, print_hint, print_kv, print_table, truncate, OutputMode,
};
use crate::init::AppContext;
use crate::models::{Notebook, SourceRef};

pub async fn handle_list(ctx: &AppContext, limit: usize, mode: OutputMode) -> Result<()> {
    let client = ctx.client().await?;
    let notebooks: Vec<Notebook> = client
        .list_notebooks()
        .await?
        .into_iter()
        .take(limit)
        .collect();

    match mode {
        OutputMode::Json => output_json(&notebooks),
        OutputMode::Human => {
            let rows = notebooks
                .iter()
                .map(|nb| {
                    vec![
                        nb.id.clone(),
                        truncate(&nb.title, 50),
                        nb.source_count.to_string(),
                        label(&nb.ownership()),
                        if nb.is_shared { "yes" } else { "" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "Title", "Sources", "Ownership", "Shared"], rows);
        }
    }
    Ok(())
}

/// The raw record is only meaningful as JSON.
pub async fn handle_get(ctx: &AppContext, notebook_id: &str) -> Result<()> {
    let client = ctx.client().await?;
    match client.get_notebook(notebook_id).await? {
        Some(record) => output_json(&record),
        None => bail!("Notebook not found: {}", notebook_id),
    }
    Ok(())
}

#[derive(Serialize)]
struct SourceRow {
    #[serde(flatten)]
    source: SourceRef,
    /// `None` when unchecked or not syncable.
    is_fresh: Option<bool>,
}

pub async fn handle_sources(
    ctx: &AppContext,
    notebook_id: &str,
    freshness: bool,
    mode: OutputMode,
) -> Result<()> {
    let client = ctx.client().await?;
    let mut rows = Vec::new();
    for source in client.get_notebook_sources(notebook_id).await? {
        let is_fresh = if freshness && source.can_sync {
            client.check_source_freshness(&source.id).await?
        } else {
            None
        };
        rows.push(SourceRow { source, is_fresh });
    }

    match mode {
        OutputMode::Json => output_json(&rows),
        OutputMode::Human => {
            let table = rows
                .iter()
                .map(|row| {
                    let sync = match (row.source.can_sync, row.is_fresh) {
                        (false, _) => String::new(),
                        (true, Some(false)) => "stale".yellow().to_string(),
                        (true, Some(true)) => "fresh".green().to_string(),
                        (true, None) => "syncable".to_string(),
                    };
                    vec![
                        row.source.id.clone(),
                        truncate(&row.source.title, 50),
                        label(&row.source.source_type),
                        sync,
                    ]
                })
                .collect();
            print_table(&["ID", "Title", "Type", "Drive"], table);
        }
    }
    Ok(())
}

pub async fn handle_ask(
    ctx: &AppContext,
    notebook_id: &str,
    question: &str,
    source_ids: Option<Vec<String>>,
    conversation_id: Option<String>,
    mode: OutputMode,
) -> Result<()> {
    let client = ctx.client().await?;
    let answer = client
        .query(notebook_id, question, source_ids, conversation_id)
        .await?;

    match mode {
        OutputMode::Json => output_json(&answer),
        OutputMode::Human => {
            print_header("Answer");
            println!("{}", answer.answer);
            println!();
            print_kv("Conversation", &answer.conversation_id);
            print_hint("Pass --conversation-id to ask a follow-up.");
        }
    }
    Ok(())
}
