use serde_json::{json, Value};

use super::{client_settings, NotebookClient};
use crate::mapper;
use crate::models::{AddedSource, DriveDocType, SyncedSource};
use crate::rpc::{ops, RpcCall};
use crate::NblmError;

/// Title given to pasted text added without one.
pub const PASTED_TEXT_TITLE: &str = "Pasted Text";

impl NotebookClient {
    async fn add_source(
        &self,
        notebook_id: &str,
        source_data: Value,
        fallback_title: &str,
    ) -> Result<Option<AddedSource>, NblmError> {
        let call = RpcCall::new(
            ops::ADD_SOURCE,
            json!([[[source_data]], notebook_id, [2], client_settings()]),
        )
        .on_notebook(notebook_id);

        Ok(self
            .invoke_json(call)
            .await?
            .and_then(|result| mapper::map_added_source(&result, fallback_title)))
    }

    /// Add a web page or video link.
    pub async fn add_url_source(&self, notebook_id: &str, url: &str) -> Result<Option<AddedSource>, NblmError> {
        let data = json!([null, null, [url], null, null, null, null, null, null, null, 1]);
        self.add_source(notebook_id, data, "Untitled").await
    }

    pub async fn add_text_source(
        &self,
        notebook_id: &str,
        text: &str,
        title: &str,
    ) -> Result<Option<AddedSource>, NblmError> {
        let data = json!([null, [title, text], null, 2, null, null, null, null, null, null, 1]);
        self.add_source(notebook_id, data, title).await
    }

    pub async fn add_drive_source(
        &self,
        notebook_id: &str,
        document_id: &str,
        title: &str,
        doc_type: DriveDocType,
    ) -> Result<Option<AddedSource>, NblmError> {
        let data = json!([
            [document_id, doc_type.mime_type(), 1, title],
            null, null, null, null, null, null, null, null, null,
            1
        ]);
        self.add_source(notebook_id, data, title).await
    }

    /// `Some(true)` when a Drive source matches its document, `Some(false)` when stale.
    pub async fn check_source_freshness(&self, source_id: &str) -> Result<Option<bool>, NblmError> {
        let call = RpcCall::new(ops::CHECK_FRESHNESS, json!([null, [source_id], [2]]));
        Ok(self
            .invoke_json(call)
            .await?
            .and_then(|result| mapper::map_freshness(&result)))
    }

    /// Pull the latest content of a Drive source.
    pub async fn sync_drive_source(&self, source_id: &str) -> Result<Option<SyncedSource>, NblmError> {
        let call = RpcCall::new(ops::SYNC_DRIVE, json!([null, [source_id], [2]]));
        Ok(self
            .invoke_json(call)
            .await?
            .and_then(|result| mapper::map_synced_source(&result)))
    }
}
