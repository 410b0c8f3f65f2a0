//! Shared initialization logic for MCP and CLI modes.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::{cookie_header, resolve_credentials};
use crate::client::NotebookClient;
use crate::config::{load_config, NblmConfig};
use crate::rpc::{HttpTransport, RpcSession, SessionTokens, Transport};
use crate::NblmError;

/// Application context: data path, config, and the lazily built client.
///
/// Shared between MCP server and CLI commands.
pub struct AppContext {
    pub data_path: PathBuf,
    pub config: NblmConfig,
    client: RwLock<Option<Arc<NotebookClient>>>,
    transport_override: Option<Arc<dyn Transport>>,
}

/// Data path priority: explicit path > NBLM_DATA_PATH env > ~/.nblm
pub fn resolve_data_path(explicit_path: Option<PathBuf>) -> PathBuf {
    explicit_path
        .or_else(|| std::env::var("NBLM_DATA_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".nblm"))
                .unwrap_or_else(|| PathBuf::from(".nblm"))
        })
}

impl AppContext {
    /// Initialize application context. No network traffic happens here.
    pub async fn new(explicit_path: Option<PathBuf>) -> Result<Self> {
        let data_path = resolve_data_path(explicit_path);
        tracing::info!("Using data path: {}", data_path.display());

        let config = load_config(&data_path);
        Ok(Self::from_parts(data_path, config, None))
    }

    /// Context whose clients talk through `transport` instead of HTTP.
    pub fn with_transport(data_path: PathBuf, config: NblmConfig, transport: Arc<dyn Transport>) -> Self {
        Self::from_parts(data_path, config, Some(transport))
    }

    fn from_parts(
        data_path: PathBuf,
        config: NblmConfig,
        transport_override: Option<Arc<dyn Transport>>,
    ) -> Self {
        Self {
            data_path,
            config,
            client: RwLock::new(None),
            transport_override,
        }
    }

    /// The shared client, built from the current credentials on first use.
    pub async fn client(&self) -> Result<Arc<NotebookClient>, NblmError> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(client.clone());
        }

        let mut slot = self.client.write().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Arc::new(self.build_client()?);
        *slot = Some(client.clone());
        Ok(client)
    }

    fn build_client(&self) -> Result<NotebookClient, NblmError> {
        let credentials = resolve_credentials(&self.data_path)?;
        let settings = self.config.wire_settings();

        let transport: Arc<dyn Transport> = match &self.transport_override {
            Some(transport) => transport.clone(),
            None => Arc::new(HttpTransport::new(
                &settings.base_url,
                &cookie_header(&credentials.cookies),
                self.config.timeouts(),
            )?),
        };

        tracing::info!(
            source = ?credentials.source,
            cookies = credentials.cookies.len(),
            "Client created"
        );

        let tokens = SessionTokens {
            csrf_token: credentials.csrf_token,
            session_id: credentials.session_id,
        };
        Ok(NotebookClient::new(RpcSession::new(transport, settings, tokens)))
    }

    /// Drop the cached client so the next call picks up new credentials.
    pub async fn reset_client(&self) {
        if self.client.write().await.take().is_some() {
            tracing::info!("Client reset");
        }
    }

    pub async fn shutdown(&self) {
        self.client.write().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_path_wins() {
        let path = resolve_data_path(Some(PathBuf::from("/tmp/explicit")));
        assert_eq!(path, PathBuf::from("/tmp/explicit"));
    }
}
