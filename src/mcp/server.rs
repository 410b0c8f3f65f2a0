use crate::mcp::progress::{make_mcp_progress, PollJob};
use rmcp::{
    handler::server::tool::ToolRouter,
    handler::server::wrapper::{Json, Parameters},
    model::*,
    tool, tool_handler, tool_router, Peer, RoleServer, ServerHandler, ServiceExt,
};
use std::sync::Arc;
use tracing::instrument;

use crate::client::NotebookClient;
use crate::init::AppContext;
use crate::mcp::error::ToolError;
use crate::mcp::{
    AddDriveInput, AddTextInput, AddUrlInput, AudioOverviewInput, ChatConfigureInput,
    ChatConfigureResponse, MessageResponse, NotebookCreateInput, NotebookDeleteInput,
    NotebookGetResponse, NotebookIdInput, NotebookListInput, NotebookListResponse,
    NotebookQueryInput, NotebookRenameInput, NotebookResponse, QueryResponse,
    ResearchImportInput, ResearchImportResponse, ResearchStartInput, ResearchStartResponse,
    ResearchStatusInput, ResearchStatusResponse, SaveAuthTokensInput, SaveAuthTokensResponse,
    SourceListDriveResponse, SourceResponse, SourceSyncInput, SourceSyncResponse,
    StudioCreateResponse, StudioDeleteInput, StudioStatusInput, StudioStatusResponse,
    VideoOverviewInput,
};
use crate::NblmError;

const INSTRUCTIONS: &str = r#"# nblm: NotebookLM (consumer) over its private batch-RPC interface

Consumer NotebookLM lives at notebooklm.google.com. Calls use browser cookies;
the CSRF token and session id are derived from the landing page automatically.

## Authentication
Copy the Cookie header of any notebooklm.google.com request and call
save_auth_tokens(cookies=...). Cookies last for weeks. An AUTH_EXPIRED error
means they must be saved again.

## Tools
- notebook_list, notebook_create, notebook_get, notebook_rename
- notebook_delete (REQUIRES confirmation)
- chat_configure: goal default|learning_guide|custom (+custom_prompt), response_length default|longer|shorter
- notebook_add_url, notebook_add_text, notebook_add_drive
- notebook_query: ask over all or selected sources; pass conversation_id for follow-ups
- source_list_drive, source_sync_drive (REQUIRES confirmation)
- research_start, research_status, research_import
- audio_overview_create, video_overview_create (REQUIRE confirmation)
- studio_status, studio_delete (REQUIRES confirmation)
- save_auth_tokens

## Research
1. research_start(query, source=web|drive, mode=fast|deep). Deep is web only.
2. research_status(notebook_id) waits until research.status is completed.
3. research_import(notebook_id, task_id, source_indices?) imports all or selected sources.

## Drive sync
1. source_list_drive(notebook_id) shows which Drive sources need_sync.
2. Ask the user, then source_sync_drive(source_ids, confirm=true).

## Studio
1. Call audio_overview_create / video_overview_create without confirm; show the returned settings.
2. After approval call again with confirm=true. Generation takes several minutes.
3. studio_status(notebook_id, max_wait?) reports progress and media URLs.
Audio formats: deep_dive, brief, critique, debate. Lengths: short, default, long.
Video formats: explainer, brief. Styles: auto_select, classic, whiteboard, kawaii, anime,
watercolor, retro_print, heritage, paper_craft, custom.

## Confirmation
notebook_delete, studio_delete, source_sync_drive, audio_overview_create and
video_overview_create do nothing until confirm=true. Only set it after the user approves.

## Limitations
The interface is undocumented and may change. Free tier queries are rate limited.
"#;

/// MCP server exposing every notebook operation as a tool.
#[derive(Clone)]
pub struct NblmServer {
    pub(crate) ctx: Arc<AppContext>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NblmServer {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    /// The shared client; built from the saved credentials on first use.
    pub(crate) async fn client(&self) -> Result<Arc<NotebookClient>, NblmError> {
        self.ctx.client().await
    }

    // ==========================================================================
    // NOTEBOOKS
    // ==========================================================================

    #[tool(description = "List notebooks with source counts and ownership.")]
    #[instrument(name = "mcp.notebook_list", skip_all)]
    pub async fn notebook_list(
        &self,
        request: Parameters<NotebookListInput>,
    ) -> Result<Json<NotebookListResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_notebook_list(input).await.map(Json)
    }

    #[tool(description = "Create a new notebook.")]
    #[instrument(name = "mcp.notebook_create", skip_all)]
    pub async fn notebook_create(
        &self,
        request: Parameters<NotebookCreateInput>,
    ) -> Result<Json<NotebookResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_notebook_create(input).await.map(Json)
    }

    #[tool(description = "Get the full notebook record, including sources.")]
    #[instrument(name = "mcp.notebook_get", skip_all)]
    pub async fn notebook_get(
        &self,
        request: Parameters<NotebookIdInput>,
    ) -> Result<Json<NotebookGetResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_notebook_get(input).await.map(Json)
    }

    #[tool(description = "Rename a notebook.")]
    #[instrument(name = "mcp.notebook_rename", skip_all)]
    pub async fn notebook_rename(
        &self,
        request: Parameters<NotebookRenameInput>,
    ) -> Result<Json<NotebookResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_notebook_rename(input).await.map(Json)
    }

    #[tool(
        description = "Delete a notebook permanently. IRREVERSIBLE: ask the user first, then call with confirm=true."
    )]
    #[instrument(name = "mcp.notebook_delete", skip_all)]
    pub async fn notebook_delete(
        &self,
        request: Parameters<NotebookDeleteInput>,
    ) -> Result<Json<MessageResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_notebook_delete(input).await.map(Json)
    }

    #[tool(
        description = "Configure chat goal (default, learning_guide, custom + custom_prompt) and response length (default, longer, shorter)."
    )]
    #[instrument(name = "mcp.chat_configure", skip_all)]
    pub async fn chat_configure(
        &self,
        request: Parameters<ChatConfigureInput>,
    ) -> Result<Json<ChatConfigureResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_chat_configure(input).await.map(Json)
    }

    // ==========================================================================
    // SOURCES
    // ==========================================================================

    #[tool(description = "Add a web page or YouTube URL as a source.")]
    #[instrument(name = "mcp.notebook_add_url", skip_all)]
    pub async fn notebook_add_url(
        &self,
        request: Parameters<AddUrlInput>,
    ) -> Result<Json<SourceResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_add_url(input).await.map(Json)
    }

    #[tool(description = "Add pasted text as a source.")]
    #[instrument(name = "mcp.notebook_add_text", skip_all)]
    pub async fn notebook_add_text(
        &self,
        request: Parameters<AddTextInput>,
    ) -> Result<Json<SourceResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_add_text(input).await.map(Json)
    }

    #[tool(description = "Add a Google Drive document (doc, slides, sheets, pdf) as a source.")]
    #[instrument(name = "mcp.notebook_add_drive", skip_all)]
    pub async fn notebook_add_drive(
        &self,
        request: Parameters<AddDriveInput>,
    ) -> Result<Json<SourceResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_add_drive(input).await.map(Json)
    }

    #[tool(
        description = "Ask a question over the notebook's sources. Pass conversation_id to follow up."
    )]
    #[instrument(name = "mcp.notebook_query", skip_all)]
    pub async fn notebook_query(
        &self,
        request: Parameters<NotebookQueryInput>,
    ) -> Result<Json<QueryResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_notebook_query(input).await.map(Json)
    }

    #[tool(
        description = "List sources grouped by Drive syncability and check each Drive source for staleness."
    )]
    #[instrument(name = "mcp.source_list_drive", skip_all)]
    pub async fn source_list_drive(
        &self,
        request: Parameters<NotebookIdInput>,
    ) -> Result<Json<SourceListDriveResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_source_list_drive(input).await.map(Json)
    }

    #[tool(
        description = "Sync Drive sources with their latest content. Call source_list_drive first, ask the user, then call with confirm=true."
    )]
    #[instrument(name = "mcp.source_sync_drive", skip_all)]
    pub async fn source_sync_drive(
        &self,
        request: Parameters<SourceSyncInput>,
    ) -> Result<Json<SourceSyncResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_source_sync_drive(input).await.map(Json)
    }

    // ==========================================================================
    // RESEARCH
    // ==========================================================================

    #[tool(
        description = "Start web or Drive research to discover sources. Creates a notebook unless notebook_id is given."
    )]
    #[instrument(name = "mcp.research_start", skip_all)]
    pub async fn research_start(
        &self,
        request: Parameters<ResearchStartInput>,
    ) -> Result<Json<ResearchStartResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_research_start(input).await.map(Json)
    }

    #[tool(
        description = "Wait for research to finish (polls every poll_interval seconds up to max_wait) and list discovered sources."
    )]
    #[instrument(name = "mcp.research_status", skip_all)]
    pub async fn research_status(
        &self,
        request: Parameters<ResearchStatusInput>,
        meta: Meta,
        client: Peer<RoleServer>,
    ) -> Result<Json<ResearchStatusResponse>, ToolError> {
        let progress = make_mcp_progress(&meta, &client, PollJob::Research);
        let Parameters(input) = request;
        self.handle_research_status(input, progress).await.map(Json)
    }

    #[tool(description = "Import all or selected discovered sources into the notebook.")]
    #[instrument(name = "mcp.research_import", skip_all)]
    pub async fn research_import(
        &self,
        request: Parameters<ResearchImportInput>,
    ) -> Result<Json<ResearchImportResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_research_import(input).await.map(Json)
    }

    // ==========================================================================
    // STUDIO
    // ==========================================================================

    #[tool(
        description = "Generate an audio overview. Without confirm=true only returns the settings for the user to approve."
    )]
    #[instrument(name = "mcp.audio_overview_create", skip_all)]
    pub async fn audio_overview_create(
        &self,
        request: Parameters<AudioOverviewInput>,
    ) -> Result<Json<StudioCreateResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_audio_overview_create(input).await.map(Json)
    }

    #[tool(
        description = "Generate a video overview. Without confirm=true only returns the settings for the user to approve."
    )]
    #[instrument(name = "mcp.video_overview_create", skip_all)]
    pub async fn video_overview_create(
        &self,
        request: Parameters<VideoOverviewInput>,
    ) -> Result<Json<StudioCreateResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_video_overview_create(input).await.map(Json)
    }

    #[tool(
        description = "List audio/video artifacts with status and media URLs. Set max_wait to wait for generation to finish."
    )]
    #[instrument(name = "mcp.studio_status", skip_all)]
    pub async fn studio_status(
        &self,
        request: Parameters<StudioStatusInput>,
        meta: Meta,
        client: Peer<RoleServer>,
    ) -> Result<Json<StudioStatusResponse>, ToolError> {
        let progress = make_mcp_progress(&meta, &client, PollJob::Studio);
        let Parameters(input) = request;
        self.handle_studio_status(input, progress).await.map(Json)
    }

    #[tool(
        description = "Delete an audio/video artifact permanently. IRREVERSIBLE: ask the user first, then call with confirm=true."
    )]
    #[instrument(name = "mcp.studio_delete", skip_all)]
    pub async fn studio_delete(
        &self,
        request: Parameters<StudioDeleteInput>,
    ) -> Result<Json<MessageResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_studio_delete(input).await.map(Json)
    }

    // ==========================================================================
    // AUTH
    // ==========================================================================

    #[tool(
        description = "Save the Cookie header of a logged-in notebooklm.google.com request. CSRF token and session id are optional."
    )]
    #[instrument(name = "mcp.save_auth_tokens", skip_all)]
    pub async fn save_auth_tokens(
        &self,
        request: Parameters<SaveAuthTokensInput>,
    ) -> Result<Json<SaveAuthTokensResponse>, ToolError> {
        let Parameters(input) = request;
        self.handle_save_auth_tokens(input).await.map(Json)
    }
}

#[tool_handler]
impl ServerHandler for NblmServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nblm".to_string(),
                title: Some("NotebookLM batch-RPC client".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run MCP server on stdio transport.
pub async fn run_mcp_server(ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let server = NblmServer::new(ctx.clone());

    tracing::info!("Starting nblm MCP server v{}", env!("CARGO_PKG_VERSION"));

    // Measure context budget
    {
        fn estimate_tokens(text: &str) -> usize {
            text.len().div_ceil(4)
        }

        let server_info = server.get_info();
        let info_tokens = estimate_tokens(&serde_json::to_string(&server_info).unwrap_or_default());
        let instructions_tokens = server_info
            .instructions
            .as_deref()
            .map(estimate_tokens)
            .unwrap_or(0);
        tracing::info!(
            "MCP context budget: {} tokens (info: {}, instructions: {})",
            info_tokens + instructions_tokens,
            info_tokens,
            instructions_tokens
        );
    }

    match crate::auth::resolve_credentials(&ctx.data_path) {
        Ok(credentials) => tracing::info!(source = ?credentials.source, "Credentials found"),
        Err(e) => tracing::warn!("{}. Tools will fail until save_auth_tokens is called.", e),
    }

    // Stdio transport
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;
    tracing::info!("MCP server listening on stdio (20 tools)");

    tokio::select! {
        result = service.waiting() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("MCP server shutting down");
    ctx.shutdown().await;

    Ok(())
}
