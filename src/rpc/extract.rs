//! Locate an operation's payload inside decoded response chunks.

use serde_json::Value;

use super::ops::RESULT_MARKER;

/// Payload of a result triplet.
///
/// Most payloads are JSON encoded a second time inside a string; when that
/// inner string is not valid JSON it is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcPayload {
    Json(Value),
    Raw(String),
}

impl RpcPayload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RpcPayload::Json(value) => Some(value),
            RpcPayload::Raw(_) => None,
        }
    }

    /// The structured payload, or `Value::Null` for raw text.
    pub fn into_json(self) -> Value {
        match self {
            RpcPayload::Json(value) => value,
            RpcPayload::Raw(_) => Value::Null,
        }
    }
}

fn decode_payload(slot: &Value) -> Option<RpcPayload> {
    match slot {
        Value::Null => None,
        Value::String(text) => Some(
            serde_json::from_str(text)
                .map(RpcPayload::Json)
                .unwrap_or_else(|_| RpcPayload::Raw(text.clone())),
        ),
        other => Some(RpcPayload::Json(other.clone())),
    }
}

fn result_triplets<'a>(chunk: &'a Value) -> impl Iterator<Item = &'a Vec<Value>> + 'a {
    chunk
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .filter(|item| item.len() >= 3 && item[0] == RESULT_MARKER)
}

/// Find the first result triplet for `operation_id` and decode its payload.
///
/// Returns `None` when no triplet names the operation or when the first
/// matching triplet carries a null payload.
pub fn extract_result(chunks: &[Value], operation_id: &str) -> Option<RpcPayload> {
    chunks
        .iter()
        .flat_map(result_triplets)
        .find(|item| item[1] == operation_id)
        .and_then(|item| decode_payload(&item[2]))
}

/// Pull the final answer text out of a streamed query response.
///
/// Later chunks hold longer partial answers, so the search runs newest first.
pub fn extract_stream_answer(chunks: &[Value]) -> Option<String> {
    chunks.iter().rev().flat_map(result_triplets).find_map(|item| {
        let text = item[2].as_str().filter(|s| !s.is_empty())?;
        let parsed: Value = serde_json::from_str(text).ok()?;
        parsed
            .get(0)
            .and_then(|inner| inner.get(0))
            .and_then(Value::as_str)
            .filter(|answer| !answer.is_empty())
            .map(str::to_string)
    })
}
