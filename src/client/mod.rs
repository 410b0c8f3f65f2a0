//! Operation client: one async method per remote operation.
//!
//! Each method validates its input, builds the positional params, performs
//! exactly one round trip and maps the payload. An absent payload becomes the
//! operation's failure value (`None`, `false`, or an empty list); transport
//! and authentication failures propagate as errors. Nothing is retried.

mod notebooks;
mod query;
mod research;
mod sources;
mod studio;

use serde_json::Value;

use crate::rpc::{RpcCall, RpcPayload, RpcSession};
use crate::NblmError;

pub use research::{import_entry, validate_research};
pub use sources::PASTED_TEXT_TITLE;
pub use studio::{audio_params, video_params};

/// Trailing settings block sent with create and add-source calls.
fn client_settings() -> Value {
    serde_json::json!([1, null, null, null, null, null, null, null, null, null, [1]])
}

pub struct NotebookClient {
    session: RpcSession,
}

impl NotebookClient {
    pub fn new(session: RpcSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &RpcSession {
        &self.session
    }

    /// Perform one call and return the raw payload, if any.
    async fn invoke(&self, call: RpcCall) -> Result<Option<RpcPayload>, NblmError> {
        self.session.call(&call).await
    }

    /// Perform one call and return its structured payload.
    ///
    /// A payload that is not JSON counts as absent.
    async fn invoke_json(&self, call: RpcCall) -> Result<Option<Value>, NblmError> {
        Ok(self.invoke(call).await?.and_then(|p| match p {
            RpcPayload::Json(value) => Some(value),
            RpcPayload::Raw(text) => {
                tracing::warn!(bytes = text.len(), "Unparseable payload ignored");
                None
            }
        }))
    }
}
