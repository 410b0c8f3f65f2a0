//! Envelope codec for the batch-RPC and streaming query endpoints.
//!
//! Requests are form-encoded: the envelope goes in `f.req`, the anti-forgery
//! token (when known) in `at`. Responses start with an anti-scraping prefix
//! followed by alternating byte-count lines and JSON lines; bare JSON lines
//! without a count also occur. Decoding is best effort and never fails.

use serde_json::{json, Value};
use url::form_urlencoded;

use super::ops::{RpcCall, ANTI_XSSI_PREFIX, BATCH_PATH, STREAM_QUERY_PATH};

/// Fixed query parameters shared by both endpoints.
#[derive(Debug, Clone, Copy)]
pub struct WireContext<'a> {
    pub base_url: &'a str,
    pub build_label: &'a str,
    pub locale: &'a str,
    pub session_id: Option<&'a str>,
}

/// Build the `[[[op, params_json, null, "generic"]]]` envelope as a JSON string.
pub fn batch_envelope(call: &RpcCall) -> String {
    json!([[[call.operation_id, call.params.to_string(), null, "generic"]]]).to_string()
}

/// Form body for a batch-RPC call.
pub fn encode_batch(call: &RpcCall, csrf_token: Option<&str>) -> String {
    form_body(&batch_envelope(call), csrf_token)
}

/// Form body for the streaming query endpoint: `[null, params_json]`.
pub fn encode_stream(params: &Value, csrf_token: Option<&str>) -> String {
    let envelope = json!([null, params.to_string()]).to_string();
    form_body(&envelope, csrf_token)
}

fn form_body(envelope: &str, csrf_token: Option<&str>) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("f.req", envelope);
    if let Some(token) = csrf_token.filter(|t| !t.is_empty()) {
        form.append_pair("at", token);
    }
    form.finish()
}

/// URL for a batch-RPC call.
pub fn batch_url(ctx: &WireContext<'_>, call: &RpcCall) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("rpcids", call.operation_id)
        .append_pair("source-path", &call.path_hint)
        .append_pair("bl", ctx.build_label)
        .append_pair("hl", ctx.locale)
        .append_pair("rt", "c");
    if let Some(sid) = ctx.session_id.filter(|s| !s.is_empty()) {
        query.append_pair("f.sid", sid);
    }
    format!("{}{}?{}", ctx.base_url, BATCH_PATH, query.finish())
}

/// URL for the streaming query endpoint.
pub fn stream_url(ctx: &WireContext<'_>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("bl", ctx.build_label)
        .append_pair("hl", ctx.locale)
        .append_pair("rt", "c");
    if let Some(sid) = ctx.session_id.filter(|s| !s.is_empty()) {
        query.append_pair("f.sid", sid);
    }
    format!("{}{}?{}", ctx.base_url, STREAM_QUERY_PATH, query.finish())
}

/// Decode a raw response body into its JSON chunks, in arrival order.
///
/// A line holding only an integer announces the length of the next line,
/// which is then parsed as JSON. Any other non-empty line is parsed as JSON
/// directly. Lines that fail to parse are skipped.
pub fn decode_response(raw: &str) -> Vec<Value> {
    let body = raw.strip_prefix(ANTI_XSSI_PREFIX).unwrap_or(raw);
    let mut chunks = Vec::new();
    let mut lines = body.trim().lines();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.parse::<i64>().is_ok() {
            if let Some(payload) = lines.next() {
                match serde_json::from_str::<Value>(payload) {
                    Ok(value) => chunks.push(value),
                    Err(e) => tracing::trace!("Skipping counted chunk: {}", e),
                }
            }
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(value) => chunks.push(value),
            Err(e) => tracing::trace!("Skipping bare chunk: {}", e),
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::ops;
    use pretty_assertions::assert_eq;

    fn ctx(session_id: Option<&str>) -> WireContext<'_> {
        WireContext {
            base_url: "https://notebooklm.google.com",
            build_label: "bl_test",
            locale: "en",
            session_id,
        }
    }

    fn form_pairs(body: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn test_encode_batch_wraps_params_twice() {
        let call = RpcCall::new(ops::LIST_NOTEBOOKS, json!([null, 1, null, [2]]));
        let body = encode_batch(&call, Some("tok:123"));
        let pairs = form_pairs(&body);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "f.req");
        assert_eq!(pairs[1], ("at".to_string(), "tok:123".to_string()));

        let envelope: Value = serde_json::from_str(&pairs[0].1).unwrap();
        assert_eq!(envelope[0][0][0], "wXbhsf");
        assert_eq!(envelope[0][0][2], Value::Null);
        assert_eq!(envelope[0][0][3], "generic");
        let params: Value = serde_json::from_str(envelope[0][0][1].as_str().unwrap()).unwrap();
        assert_eq!(params, json!([null, 1, null, [2]]));
    }

    #[test]
    fn test_encode_batch_omits_empty_token() {
        let call = RpcCall::new(ops::LIST_NOTEBOOKS, json!([]));
        assert_eq!(form_pairs(&encode_batch(&call, Some(""))).len(), 1);
        assert_eq!(form_pairs(&encode_batch(&call, None)).len(), 1);
    }

    #[test]
    fn test_encode_stream_uses_two_element_tuple() {
        let body = encode_stream(&json!([[], "why?", null]), None);
        let pairs = form_pairs(&body);
        let envelope: Value = serde_json::from_str(&pairs[0].1).unwrap();
        assert_eq!(envelope.as_array().unwrap().len(), 2);
        assert_eq!(envelope[0], Value::Null);
        assert_eq!(envelope[1], "[[],\"why?\",null]");
    }

    #[test]
    fn test_batch_url_carries_fixed_params() {
        let call = RpcCall::new(ops::GET_NOTEBOOK, json!([])).on_notebook("nb-1");
        let url = batch_url(&ctx(Some("sid-9")), &call);
        assert!(url.starts_with("https://notebooklm.google.com/_/LabsTailwindUi/data/batchexecute?"));
        assert!(url.contains("rpcids=rLM1Ne"));
        assert!(url.contains("source-path=%2Fnotebook%2Fnb-1"));
        assert!(url.contains("bl=bl_test"));
        assert!(url.contains("hl=en"));
        assert!(url.contains("rt=c"));
        assert!(url.ends_with("f.sid=sid-9"));
    }

    #[test]
    fn test_batch_url_without_session() {
        let call = RpcCall::new(ops::LIST_NOTEBOOKS, json!([]));
        assert!(!batch_url(&ctx(None), &call).contains("f.sid"));
    }

    #[test]
    fn test_stream_url_has_no_rpcids() {
        let url = stream_url(&ctx(None));
        assert!(url.contains("GenerateFreeFormStreamed?"));
        assert!(!url.contains("rpcids"));
    }

    #[test]
    fn test_decode_counted_chunks() {
        let raw = ")]}'\n23\n[[\"wrb.fr\",\"OP123\",\"{\\\"a\\\":1}\",null]]\n";
        let chunks = decode_response(raw);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0][0][1], "OP123");
    }

    #[test]
    fn test_decode_mixed_layouts_preserves_order() {
        let raw = ")]}'\n\n12\n[\"first\"]\n[\"second\"]\n7\n[\"third\"]\n";
        let chunks = decode_response(raw);
        assert_eq!(chunks, vec![json!(["first"]), json!(["second"]), json!(["third"])]);
    }

    #[test]
    fn test_decode_skips_malformed_lines() {
        let raw = ")]}'\n5\n[broken\n[\"ok\"]\nnot json at all\n";
        assert_eq!(decode_response(raw), vec![json!(["ok"])]);
    }

    #[test]
    fn test_decode_without_prefix() {
        assert_eq!(decode_response("[1,2]"), vec![json!([1, 2])]);
    }

    #[test]
    fn test_decode_trailing_count_without_payload() {
        assert_eq!(decode_response(")]}'\n[1]\n40"), vec![json!([1])]);
    }

    #[test]
    fn test_batch_body_snapshot() {
        let call = RpcCall::new(ops::DELETE_NOTEBOOK, json!([["nb-1"], [2]]));
        insta::assert_snapshot!(encode_batch(&call, Some("csrf")), @"f.req=%5B%5B%5B%22WWINqb%22%2C%22%5B%5B%5C%22nb-1%5C%22%5D%2C%5B2%5D%5D%22%2Cnull%2C%22generic%22%5D%5D%5D&at=csrf");
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_decode_never_panics(raw in "\\PC{0,200}") {
                let _ = decode_response(&raw);
            }

            #[test]
            fn prop_counted_stream_round_trips(items in proptest::collection::vec("[a-z0-9 ]{0,12}", 0..8)) {
                let chunks: Vec<Value> = items.iter().map(|s| json!([s])).collect();
                let mut raw = String::from(ANTI_XSSI_PREFIX);
                raw.push('\n');
                for chunk in &chunks {
                    let line = chunk.to_string();
                    raw.push_str(&format!("{}\n{}\n", line.len(), line));
                }
                prop_assert_eq!(decode_response(&raw), chunks);
            }
        }
    }
}
