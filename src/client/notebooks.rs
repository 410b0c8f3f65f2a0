use serde_json::{json, Value};
use tracing::info;

use super::{client_settings, NotebookClient};
use crate::mapper;
use crate::models::{ChatGoal, ChatSettings, Notebook, ResponseLength, SourceRef, MAX_CUSTOM_PROMPT_CHARS};
use crate::rpc::{ops, RpcCall};
use crate::NblmError;

/// Reject chat settings the server would refuse, before any request is made.
pub(crate) fn validate_chat_settings(goal: ChatGoal, custom_prompt: Option<&str>) -> Result<(), NblmError> {
    if goal != ChatGoal::Custom {
        return Ok(());
    }
    let prompt = custom_prompt.unwrap_or_default();
    if prompt.is_empty() {
        return Err(NblmError::Validation(
            "custom_prompt is required when goal='custom'".into(),
        ));
    }
    let chars = prompt.chars().count();
    if chars > MAX_CUSTOM_PROMPT_CHARS {
        return Err(NblmError::Validation(format!(
            "custom_prompt exceeds {MAX_CUSTOM_PROMPT_CHARS} chars (got {chars})"
        )));
    }
    Ok(())
}

impl NotebookClient {
    pub async fn list_notebooks(&self) -> Result<Vec<Notebook>, NblmError> {
        let call = RpcCall::new(ops::LIST_NOTEBOOKS, json!([null, 1, null, [2]]));
        Ok(self
            .invoke_json(call)
            .await?
            .map(|result| mapper::map_notebook_list(&result))
            .unwrap_or_default())
    }

    /// Full notebook record, unmapped.
    pub async fn get_notebook(&self, notebook_id: &str) -> Result<Option<Value>, NblmError> {
        let call = RpcCall::new(ops::GET_NOTEBOOK, json!([notebook_id, null, [2], null, 0]))
            .on_notebook(notebook_id);
        self.invoke_json(call).await
    }

    /// Sources of a notebook with their document type and Drive link.
    pub async fn get_notebook_sources(&self, notebook_id: &str) -> Result<Vec<SourceRef>, NblmError> {
        Ok(self
            .get_notebook(notebook_id)
            .await?
            .map(|result| mapper::map_notebook_sources(&result))
            .unwrap_or_default())
    }

    pub async fn create_notebook(&self, title: &str) -> Result<Option<Notebook>, NblmError> {
        let call = RpcCall::new(
            ops::CREATE_NOTEBOOK,
            json!([title, null, null, [2], client_settings()]),
        );
        let notebook = self
            .invoke_json(call)
            .await?
            .and_then(|result| mapper::map_created_notebook(&result, title));
        if let Some(nb) = &notebook {
            info!(notebook_id = %nb.id, "Notebook created");
        }
        Ok(notebook)
    }

    pub async fn rename_notebook(&self, notebook_id: &str, new_title: &str) -> Result<bool, NblmError> {
        let call = RpcCall::new(
            ops::UPDATE_NOTEBOOK,
            json!([notebook_id, [[null, null, null, [null, new_title]]]]),
        )
        .on_notebook(notebook_id);
        Ok(self.invoke(call).await?.is_some())
    }

    pub async fn delete_notebook(&self, notebook_id: &str) -> Result<bool, NblmError> {
        let call = RpcCall::new(ops::DELETE_NOTEBOOK, json!([[notebook_id], [2]]));
        let deleted = self.invoke(call).await?.is_some();
        if deleted {
            info!(notebook_id, "Notebook deleted");
        }
        Ok(deleted)
    }

    /// Set the chat goal and response length of a notebook.
    ///
    /// A custom goal needs a prompt of at most 10000 characters.
    pub async fn configure_chat(
        &self,
        notebook_id: &str,
        goal: ChatGoal,
        custom_prompt: Option<&str>,
        response_length: ResponseLength,
    ) -> Result<Option<ChatSettings>, NblmError> {
        validate_chat_settings(goal, custom_prompt)?;

        let goal_setting = match (goal, custom_prompt) {
            (ChatGoal::Custom, Some(prompt)) => json!([goal.code(), prompt]),
            _ => json!([goal.code()]),
        };
        let settings = json!([goal_setting, [response_length.code()]]);
        let call = RpcCall::new(
            ops::UPDATE_NOTEBOOK,
            json!([notebook_id, [[null, null, null, null, null, null, null, settings]]]),
        )
        .on_notebook(notebook_id);

        Ok(self.invoke_json(call).await?.and_then(|result| {
            mapper::map_chat_settings(&result, notebook_id, goal, custom_prompt, response_length)
        }))
    }
}
