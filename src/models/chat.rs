use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codes::{ChatGoal, ResponseLength};

/// Longest custom goal prompt the service accepts, in characters.
pub const MAX_CUSTOM_PROMPT_CHARS: usize = 10_000;

/// Chat behaviour applied to a notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatSettings {
    pub notebook_id: String,
    pub goal: ChatGoal,
    pub custom_prompt: Option<String>,
    pub response_length: ResponseLength,
    /// Settings block echoed back by the server, verbatim.
    pub raw_settings: Option<Value>,
}

/// Answer to a notebook query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryAnswer {
    pub answer: String,
    /// Pass back on a follow-up query to continue the conversation.
    pub conversation_id: String,
}
