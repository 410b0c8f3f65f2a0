//! Notebook catalog tools: list, create, get, rename, delete.

use crate::mcp::error::ToolError;
use crate::mcp::types::{
    MessageResponse, NotebookCreateInput, NotebookDeleteInput, NotebookGetResponse,
    NotebookIdInput, NotebookListInput, NotebookListResponse, NotebookRef, NotebookRenameInput,
    NotebookResponse, NotebookSummary, ToolStatus, DEFAULT_MAX_RESULTS,
};
use crate::mcp::NblmServer;

impl NblmServer {
    pub async fn handle_notebook_list(
        &self,
        input: NotebookListInput,
    ) -> Result<NotebookListResponse, ToolError> {
        let notebooks = self.client().await?.list_notebooks().await?;

        let owned_count = notebooks.iter().filter(|nb| nb.is_owned).count();
        let shared_by_me_count = notebooks
            .iter()
            .filter(|nb| nb.is_owned && nb.is_shared)
            .count();
        let max_results = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

        Ok(NotebookListResponse {
            status: ToolStatus::Success,
            count: notebooks.len(),
            owned_count,
            shared_count: notebooks.len() - owned_count,
            shared_by_me_count,
            notebooks: notebooks
                .iter()
                .take(max_results)
                .map(NotebookSummary::from)
                .collect(),
        })
    }

    pub async fn handle_notebook_create(
        &self,
        input: NotebookCreateInput,
    ) -> Result<NotebookResponse, ToolError> {
        let title = input.title.unwrap_or_default();
        let notebook = self
            .client()
            .await?
            .create_notebook(&title)
            .await?
            .ok_or_else(|| ToolError::failed("Failed to create notebook"))?;

        Ok(NotebookResponse {
            status: ToolStatus::Success,
            notebook: NotebookRef {
                url: Some(notebook.url()),
                id: notebook.id,
                title: notebook.title,
            },
        })
    }

    pub async fn handle_notebook_get(
        &self,
        input: NotebookIdInput,
    ) -> Result<NotebookGetResponse, ToolError> {
        let notebook = self
            .client()
            .await?
            .get_notebook(&input.notebook_id)
            .await?
            .ok_or_else(|| {
                ToolError::not_found(
                    format!("Notebook {} not found", input.notebook_id),
                    "Use notebook_list to find notebook ids.",
                )
            })?;

        Ok(NotebookGetResponse {
            status: ToolStatus::Success,
            notebook,
        })
    }

    pub async fn handle_notebook_rename(
        &self,
        input: NotebookRenameInput,
    ) -> Result<NotebookResponse, ToolError> {
        let renamed = self
            .client()
            .await?
            .rename_notebook(&input.notebook_id, &input.new_title)
            .await?;
        if !renamed {
            return Err(ToolError::failed("Failed to rename notebook"));
        }

        Ok(NotebookResponse {
            status: ToolStatus::Success,
            notebook: NotebookRef {
                id: input.notebook_id,
                title: input.new_title,
                url: None,
            },
        })
    }

    pub async fn handle_notebook_delete(
        &self,
        input: NotebookDeleteInput,
    ) -> Result<MessageResponse, ToolError> {
        if !input.confirm {
            return Err(ToolError::unconfirmed(
                "Deletion not confirmed. You must ask the user to confirm before deleting. Set confirm=true only after user approval.",
                Some("This action is IRREVERSIBLE. The notebook and all its sources will be permanently deleted."),
                "Show the user the notebook title from notebook_list, then ask before deleting.",
            ));
        }

        let deleted = self
            .client()
            .await?
            .delete_notebook(&input.notebook_id)
            .await?;
        if !deleted {
            return Err(ToolError::failed("Failed to delete notebook"));
        }

        Ok(MessageResponse {
            status: ToolStatus::Success,
            message: format!(
                "Notebook {} has been permanently deleted.",
                input.notebook_id
            ),
            notebook_id: None,
        })
    }
}
