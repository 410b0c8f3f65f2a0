//! Test harness: an isolated data directory plus a scripted transport.
//!
//! The transport answers each batch call from a per-operation queue of raw
//! response bodies and records every request, so tests can assert both the
//! mapped results and exactly what went over the wire.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use url::form_urlencoded;

use nblm::auth::{cache_path, import_cookie_header, save_tokens};
use nblm::config::NblmConfig;
use nblm::init::AppContext;
use nblm::mcp::NblmServer;
use nblm::rpc::ops::STREAM_QUERY_PATH;
use nblm::rpc::{PageResponse, Transport};
use nblm::NblmError;

pub const TEST_COOKIES: &str =
    "SID=sid; HSID=hsid; SSID=ssid; APISID=apisid; SAPISID=sapisid; _ga=GA1.1";

pub const LANDING_HTML: &str =
    r#"<html><script>window.WIZ_global_data = {"FdrFJe":"-4242","SNlM0e":"csrf:1700"};</script></html>"#;

/// Queue key for the streaming query endpoint.
pub const STREAM: &str = "stream";

/// Wrap `payload` the way the batch endpoint does: JSON-encoded twice, in a
/// counted chunk after the anti-scraping prefix.
pub fn batch_reply(operation_id: &str, payload: Value) -> String {
    let chunk = json!([
        ["wrb.fr", operation_id, payload.to_string(), null, null, null, "generic"],
        ["di", 87],
        ["af.httprm", 86, "-1", 5]
    ])
    .to_string();
    format!(")]}}'\n\n{}\n{}\n25\n[[\"e\",4,null,null,139]]\n", chunk.len(), chunk)
}

/// A streamed answer: one partial chunk followed by the full answer.
pub fn stream_reply(answer: &str) -> String {
    let partial = json!([["wrb.fr", null, json!([["Partial"]]).to_string()]]).to_string();
    let full = json!([["wrb.fr", null, json!([[answer, null, []]]).to_string()]]).to_string();
    format!(
        ")]}}'\n\n{}\n{}\n{}\n{}\n",
        partial.len(),
        partial,
        full.len(),
        full
    )
}

/// One recorded POST.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub key: String,
    pub url: String,
    /// Decoded `f.req` form field.
    pub envelope: Value,
    pub csrf_token: Option<String>,
}

impl RecordedCall {
    /// Params of a batch call, decoded from the inner JSON string.
    pub fn params(&self) -> Value {
        self.envelope[0][0][1]
            .as_str()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or(Value::Null)
    }

    /// Params of a streaming query, decoded from `[null, params_json]`.
    pub fn stream_params(&self) -> Value {
        self.envelope[1]
            .as_str()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or(Value::Null)
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.url.split_once('?')?.1;
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// In-memory [`Transport`] with canned replies.
///
/// The last queued reply for an operation is repeated; an operation with no
/// reply gets an empty body (no payload).
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<String>>>,
    landing: Mutex<PageResponse>,
    calls: Mutex<Vec<RecordedCall>>,
    page_fetches: AtomicUsize,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            landing: Mutex::new(PageResponse {
                final_url: "https://notebooklm.google.com/".into(),
                status: 200,
                body: LANDING_HTML.into(),
            }),
            calls: Mutex::new(Vec::new()),
            page_fetches: AtomicUsize::new(0),
        }
    }
}

impl ScriptedTransport {
    pub fn reply(&self, operation_id: &str, payload: Value) {
        self.reply_raw(operation_id, batch_reply(operation_id, payload));
    }

    pub fn reply_raw(&self, key: &str, body: String) {
        self.replies
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(body);
    }

    pub fn answer(&self, text: &str) {
        self.reply_raw(STREAM, stream_reply(text));
    }

    /// Make the landing page redirect to the login host.
    pub fn expire_session(&self) {
        let mut landing = self.landing.lock().unwrap();
        landing.final_url = "https://accounts.google.com/ServiceLogin?continue=x".into();
        landing.body = "<html>Sign in</html>".into();
    }

    pub fn set_landing_body(&self, body: &str) {
        self.landing.lock().unwrap().body = body.to_string();
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Operation ids (or `stream`) in call order.
    pub fn call_keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.key).collect()
    }

    pub fn calls_for(&self, key: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.key == key).collect()
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    fn next_reply(&self, key: &str) -> String {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => ")]}'\n".to_string(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<String, NblmError> {
        let form: HashMap<String, String> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        let envelope = form
            .get("f.req")
            .and_then(|f| serde_json::from_str(f).ok())
            .unwrap_or(Value::Null);

        let mut call = RecordedCall {
            key: String::new(),
            url: url.to_string(),
            envelope,
            csrf_token: form.get("at").cloned(),
        };
        call.key = if url.contains(STREAM_QUERY_PATH) {
            STREAM.to_string()
        } else {
            call.query_param("rpcids").unwrap_or_default()
        };

        let reply = self.next_reply(&call.key);
        self.calls.lock().unwrap().push(call);
        Ok(reply)
    }

    async fn fetch_page(&self, _url: &str) -> Result<PageResponse, NblmError> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        // Suspend like a real round trip so concurrent callers interleave.
        tokio::task::yield_now().await;
        Ok(self.landing.lock().unwrap().clone())
    }
}

/// Isolated data directory with saved cookies and a server over a scripted transport.
pub struct TestHarness {
    pub transport: Arc<ScriptedTransport>,
    pub ctx: Arc<AppContext>,
    pub server: NblmServer,
    /// Kept alive while the harness exists.
    pub temp_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let harness = Self::without_credentials();
        let import = import_cookie_header(TEST_COOKIES, "", "", true)
            .expect("Test cookies should import");
        save_tokens(&cache_path(harness.temp_dir.path()), &import.tokens)
            .expect("Failed to save test credentials");
        harness
    }

    /// Harness whose data directory holds no credentials.
    pub fn without_credentials() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp data directory");
        let transport = Arc::new(ScriptedTransport::default());
        let ctx = Arc::new(AppContext::with_transport(
            temp_dir.path().to_path_buf(),
            NblmConfig::default(),
            transport.clone(),
        ));
        let server = NblmServer::new(ctx.clone());
        Self {
            transport,
            ctx,
            server,
            temp_dir,
        }
    }
}
