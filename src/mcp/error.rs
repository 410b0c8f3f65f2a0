use crate::mcp::types::ToolStatus;
use crate::NblmError;
use rmcp::model::{Content, IntoContents};
use serde::Serialize;

/// Structured error reply for MCP tool calls.
/// Provides error_code + suggestion so LLMs can auto-fix.
#[derive(Debug, Serialize)]
pub struct ToolError {
    pub status: ToolStatus,
    pub error_code: String,
    pub message: String,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl IntoContents for ToolError {
    fn into_contents(self) -> Vec<Content> {
        let json = serde_json::to_string(&self).unwrap_or_else(|_| self.message.clone());
        vec![Content::text(json)]
    }
}

impl ToolError {
    fn new(error_code: &str, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        ToolError {
            status: ToolStatus::Error,
            error_code: error_code.into(),
            message: message.into(),
            suggestion: suggestion.into(),
            warning: None,
        }
    }

    /// The server answered without a usable payload.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(
            "OPERATION_FAILED",
            message,
            "Check the ids with notebook_list or notebook_get and retry.",
        )
    }

    pub fn invalid(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message, suggestion)
    }

    pub fn not_found(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message, suggestion)
    }

    /// A server-side job has not reached the state the operation needs.
    pub fn not_ready(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::new("NOT_READY", message, suggestion)
    }

    /// An irreversible operation was called without `confirm=true`.
    pub fn unconfirmed(
        message: impl Into<String>,
        warning: Option<&str>,
        hint: impl Into<String>,
    ) -> Self {
        ToolError {
            warning: warning.map(str::to_string),
            ..Self::new("CONFIRMATION_REQUIRED", message, hint)
        }
    }
}

impl From<NblmError> for ToolError {
    fn from(err: NblmError) -> Self {
        let message = err.to_string();
        match err {
            NblmError::Validation(_) => Self::new(
                "VALIDATION_ERROR",
                message,
                "Check parameter values; accepted values are listed in the message.",
            ),
            NblmError::AuthExpired => Self::new(
                "AUTH_EXPIRED",
                message,
                "Copy the Cookie header from a logged-in browser request and call save_auth_tokens.",
            ),
            NblmError::MissingAuth(_) => Self::new(
                "AUTH_REQUIRED",
                message,
                "Call save_auth_tokens with the browser Cookie header, or set NOTEBOOKLM_COOKIES.",
            ),
            NblmError::TokenExtraction(_) => Self::new(
                "TOKEN_EXTRACTION_FAILED",
                message,
                "The cookies may be stale. Save fresh cookies with save_auth_tokens.",
            ),
            NblmError::Transport(_) | NblmError::Http { .. } => Self::new(
                "UPSTREAM_ERROR",
                message,
                "The service did not answer normally. Retry the operation later.",
            ),
            NblmError::Config(_) | NblmError::Io(_) | NblmError::Json(_) => Self::new(
                "INTERNAL_ERROR",
                message,
                "Check the data directory and config.toml, then retry.",
            ),
        }
    }
}
