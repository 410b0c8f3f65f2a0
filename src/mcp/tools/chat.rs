//! Chat tools: ask a question, configure goal and response length.

use crate::mcp::error::ToolError;
use crate::mcp::types::{ChatConfigureInput, ChatConfigureResponse, NotebookQueryInput, QueryResponse, ToolStatus};
use crate::mcp::NblmServer;
use crate::models::{ChatGoal, ResponseLength};

impl NblmServer {
    pub async fn handle_notebook_query(
        &self,
        input: NotebookQueryInput,
    ) -> Result<QueryResponse, ToolError> {
        let answer = self
            .client()
            .await?
            .query(
                &input.notebook_id,
                &input.query,
                input.source_ids,
                input.conversation_id,
            )
            .await?;

        Ok(QueryResponse {
            status: ToolStatus::Success,
            answer: answer.answer,
            conversation_id: answer.conversation_id,
        })
    }

    pub async fn handle_chat_configure(
        &self,
        input: ChatConfigureInput,
    ) -> Result<ChatConfigureResponse, ToolError> {
        let goal: ChatGoal = match input.goal.as_deref() {
            Some(name) => name.parse()?,
            None => ChatGoal::default(),
        };
        let response_length: ResponseLength = match input.response_length.as_deref() {
            Some(name) => name.parse()?,
            None => ResponseLength::default(),
        };
        // The prompt only travels with a custom goal.
        let custom_prompt = input.custom_prompt.filter(|_| goal == ChatGoal::Custom);

        let settings = self
            .client()
            .await?
            .configure_chat(
                &input.notebook_id,
                goal,
                custom_prompt.as_deref(),
                response_length,
            )
            .await?
            .ok_or_else(|| ToolError::failed("Failed to configure chat settings"))?;

        Ok(ChatConfigureResponse {
            status: ToolStatus::Success,
            notebook_id: settings.notebook_id,
            goal: settings.goal.to_string(),
            custom_prompt: settings.custom_prompt,
            response_length: settings.response_length.to_string(),
            message: format!(
                "Chat configured: goal={goal}, response_length={response_length}"
            ),
        })
    }
}
