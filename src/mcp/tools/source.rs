//! Source tools: add url/text/drive, Drive freshness listing and sync.

use crate::client::PASTED_TEXT_TITLE;
use crate::mcp::error::ToolError;
use crate::mcp::types::{
    AddDriveInput, AddTextInput, AddUrlInput, DriveSourceEntry, DriveSummary, NotebookIdInput,
    OtherSourceEntry, SourceListDriveResponse, SourceResponse, SourceSyncInput,
    SourceSyncResponse, SyncOutcome, SyncResult, SyncSummary, ToolStatus,
};
use crate::mcp::NblmServer;
use crate::models::{AddedSource, DriveDocType};

fn added(source: Option<AddedSource>, what: &str) -> Result<SourceResponse, ToolError> {
    let source = source.ok_or_else(|| ToolError::failed(format!("Failed to add {what} source")))?;
    Ok(SourceResponse {
        status: ToolStatus::Success,
        source,
    })
}

impl NblmServer {
    pub async fn handle_add_url(&self, input: AddUrlInput) -> Result<SourceResponse, ToolError> {
        let source = self
            .client()
            .await?
            .add_url_source(&input.notebook_id, &input.url)
            .await?;
        added(source, "URL")
    }

    pub async fn handle_add_text(&self, input: AddTextInput) -> Result<SourceResponse, ToolError> {
        let title = input.title.as_deref().unwrap_or(PASTED_TEXT_TITLE);
        let source = self
            .client()
            .await?
            .add_text_source(&input.notebook_id, &input.text, title)
            .await?;
        added(source, "text")
    }

    pub async fn handle_add_drive(&self, input: AddDriveInput) -> Result<SourceResponse, ToolError> {
        let doc_type: DriveDocType = match input.doc_type.as_deref() {
            Some(name) => name.parse()?,
            None => DriveDocType::default(),
        };
        let source = self
            .client()
            .await?
            .add_drive_source(&input.notebook_id, &input.document_id, &input.title, doc_type)
            .await?;
        added(source, "Drive")
    }

    /// Group a notebook's sources by syncability and check each syncable one for staleness.
    pub async fn handle_source_list_drive(
        &self,
        input: NotebookIdInput,
    ) -> Result<SourceListDriveResponse, ToolError> {
        let client = self.client().await?;
        let sources = client.get_notebook_sources(&input.notebook_id).await?;
        let total_sources = sources.len();

        let mut syncable = Vec::new();
        let mut other = Vec::new();
        for source in sources {
            if !source.can_sync {
                other.push(OtherSourceEntry::from(source));
                continue;
            }
            let is_fresh = client.check_source_freshness(&source.id).await?;
            syncable.push(DriveSourceEntry {
                id: source.id,
                title: source.title,
                source_type: source.source_type,
                drive_doc_id: source.drive_doc_id,
                is_fresh,
                needs_sync: is_fresh == Some(false),
            });
        }

        Ok(SourceListDriveResponse {
            status: ToolStatus::Success,
            notebook_id: input.notebook_id,
            summary: DriveSummary {
                total_sources,
                syncable_sources: syncable.len(),
                stale_sources: syncable.iter().filter(|s| s.needs_sync).count(),
                other_sources: other.len(),
            },
            syncable_sources: syncable,
            other_sources: other,
        })
    }

    /// Sync each source in turn; one failure does not stop the rest.
    pub async fn handle_source_sync_drive(
        &self,
        input: SourceSyncInput,
    ) -> Result<SourceSyncResponse, ToolError> {
        if !input.confirm {
            return Err(ToolError::unconfirmed(
                "Sync not confirmed. You must ask the user to confirm before syncing. Set confirm=true only after user approval.",
                None,
                "First call source_list_drive to show stale sources, then ask user to confirm before syncing.",
            ));
        }
        if input.source_ids.is_empty() {
            return Err(ToolError::invalid(
                "No source_ids provided.",
                "Use source_list_drive to get source IDs.",
            ));
        }

        let client = self.client().await?;
        let mut results = Vec::with_capacity(input.source_ids.len());
        for source_id in &input.source_ids {
            let result = match client.sync_drive_source(source_id).await {
                Ok(Some(synced)) => SyncResult {
                    source_id: source_id.clone(),
                    status: SyncOutcome::Synced,
                    title: Some(synced.title),
                    error: None,
                },
                Ok(None) => SyncResult {
                    source_id: source_id.clone(),
                    status: SyncOutcome::Failed,
                    title: None,
                    error: Some("Sync returned no result".into()),
                },
                Err(e) => {
                    tracing::warn!(source_id = %source_id, "Drive sync failed: {}", e);
                    SyncResult {
                        source_id: source_id.clone(),
                        status: SyncOutcome::Failed,
                        title: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(result);
        }

        let synced = results
            .iter()
            .filter(|r| r.status == SyncOutcome::Synced)
            .count();
        let failed = results.len() - synced;

        Ok(SourceSyncResponse {
            status: if failed == 0 {
                ToolStatus::Success
            } else {
                ToolStatus::Partial
            },
            summary: SyncSummary {
                total: results.len(),
                synced,
                failed,
            },
            results,
        })
    }
}
