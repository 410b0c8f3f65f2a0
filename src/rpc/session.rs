//! Authenticated RPC session: transport plus the per-page-load tokens.
//!
//! The anti-forgery token and session id are scraped from the landing page.
//! They are derived lazily before the first call and only re-derived when
//! [`RpcSession::refresh_tokens`] is called explicitly.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::codec::{self, WireContext};
use super::extract::{extract_result, RpcPayload};
use super::ops::RpcCall;
use super::transport::{is_login_url, Transport};
use crate::NblmError;

static CSRF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""SNlM0e":"([^"]+)""#).expect("valid CSRF pattern"));

static SESSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""FdrFJe":"([^"]+)""#).expect("valid session pattern"));

/// Tokens embedded in the landing page. Empty strings mean "not known yet".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTokens {
    pub csrf_token: String,
    pub session_id: String,
}

/// Fixed wire settings of one service host.
#[derive(Debug, Clone)]
pub struct WireSettings {
    pub base_url: String,
    pub build_label: String,
    pub locale: String,
}

/// Pull the tokens out of landing-page HTML.
///
/// The CSRF token is required; the session id is optional.
pub fn extract_tokens(html: &str) -> Result<SessionTokens, NblmError> {
    let csrf_token = CSRF_PATTERN
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            NblmError::TokenExtraction(
                "CSRF token (SNlM0e) not found on the landing page; the page structure may have changed".into(),
            )
        })?;

    let session_id = SESSION_PATTERN
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Ok(SessionTokens {
        csrf_token,
        session_id,
    })
}

/// Fetch the landing page with the session cookies and derive fresh tokens.
pub async fn derive_tokens(
    transport: &dyn Transport,
    base_url: &str,
) -> Result<SessionTokens, NblmError> {
    let page = transport.fetch_page(&format!("{base_url}/")).await?;

    if is_login_url(&page.final_url) {
        return Err(NblmError::AuthExpired);
    }
    if page.status != 200 {
        return Err(NblmError::TokenExtraction(format!(
            "Landing page returned HTTP {}",
            page.status
        )));
    }

    extract_tokens(&page.body)
}

pub struct RpcSession {
    transport: Arc<dyn Transport>,
    settings: WireSettings,
    tokens: RwLock<SessionTokens>,
}

impl RpcSession {
    pub fn new(transport: Arc<dyn Transport>, settings: WireSettings, tokens: SessionTokens) -> Self {
        Self {
            transport,
            settings,
            tokens: RwLock::new(tokens),
        }
    }

    pub fn settings(&self) -> &WireSettings {
        &self.settings
    }

    pub async fn tokens(&self) -> SessionTokens {
        self.tokens.read().await.clone()
    }

    /// Re-derive tokens from the landing page.
    ///
    /// A session id missing from the page keeps the previous one.
    pub async fn refresh_tokens(&self) -> Result<(), NblmError> {
        let mut tokens = self.tokens.write().await;
        self.rederive(&mut tokens).await?;
        info!("Session tokens refreshed");
        Ok(())
    }

    async fn rederive(&self, tokens: &mut SessionTokens) -> Result<(), NblmError> {
        let derived = derive_tokens(self.transport.as_ref(), &self.settings.base_url).await?;
        tokens.csrf_token = derived.csrf_token;
        if !derived.session_id.is_empty() {
            tokens.session_id = derived.session_id;
        }
        Ok(())
    }

    /// Current tokens, deriving them first when none are known.
    ///
    /// The write lock is held across the landing-page fetch so concurrent
    /// first calls share a single derivation.
    async fn ensure_tokens(&self) -> Result<SessionTokens, NblmError> {
        {
            let tokens = self.tokens.read().await;
            if !tokens.csrf_token.is_empty() {
                return Ok(tokens.clone());
            }
        }

        let mut tokens = self.tokens.write().await;
        if tokens.csrf_token.is_empty() {
            self.rederive(&mut tokens).await?;
            info!("Session tokens derived");
        }
        Ok(tokens.clone())
    }

    fn wire<'a>(&'a self, tokens: &'a SessionTokens) -> WireContext<'a> {
        WireContext {
            base_url: &self.settings.base_url,
            build_label: &self.settings.build_label,
            locale: &self.settings.locale,
            session_id: Some(tokens.session_id.as_str()),
        }
    }

    /// Invoke one batch-RPC operation and extract its payload.
    ///
    /// `Ok(None)` means the server answered without a payload for the
    /// operation; callers translate that into their own failure value.
    pub async fn call(&self, call: &RpcCall) -> Result<Option<RpcPayload>, NblmError> {
        let tokens = self.ensure_tokens().await?;
        let url = codec::batch_url(&self.wire(&tokens), call);
        let body = codec::encode_batch(call, Some(&tokens.csrf_token));

        let raw = self.transport.post_form(&url, body).await?;
        let chunks = codec::decode_response(&raw);
        let payload = extract_result(&chunks, call.operation_id);

        debug!(
            op = call.operation_id,
            response_bytes = raw.len(),
            chunks = chunks.len(),
            has_payload = payload.is_some(),
            "rpc call"
        );

        Ok(payload)
    }

    /// Post to the streaming query endpoint and return the decoded chunks.
    pub async fn stream(&self, params: &Value) -> Result<Vec<Value>, NblmError> {
        let tokens = self.ensure_tokens().await?;
        let url = codec::stream_url(&self.wire(&tokens));
        let body = codec::encode_stream(params, Some(&tokens.csrf_token));

        let raw = self.transport.post_form(&url, body).await?;
        let chunks = codec::decode_response(&raw);

        debug!(response_bytes = raw.len(), chunks = chunks.len(), "stream query");

        Ok(chunks)
    }
}
