use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{
    AddedSource, ArtifactKind, ArtifactStatus, DiscoveredSource, Notebook, ResearchDepth,
    ResearchSource, SourceRef, SourceType, StudioArtifact,
};

/// Default cap on notebooks returned by `notebook_list`.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Upper bound on any caller-supplied wait, in seconds.
pub const MAX_WAIT_SECS: u64 = 1800;

/// Tag carried by every tool reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Error,
    /// Some items of a batch failed.
    Partial,
    /// Nothing was sent; the caller must repeat the call with `confirm=true`.
    PendingConfirmation,
}

// =============================================================================
// INPUTS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NotebookListInput {
    /// Maximum notebooks to return (default: 100)
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NotebookCreateInput {
    /// Optional notebook title
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookIdInput {
    /// Notebook UUID
    pub notebook_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookRenameInput {
    pub notebook_id: String,
    pub new_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookDeleteInput {
    pub notebook_id: String,
    /// Must be true; only set after the user approved the deletion
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatConfigureInput {
    pub notebook_id: String,
    /// "default", "custom" or "learning_guide" (default: "default")
    #[serde(default)]
    pub goal: Option<String>,
    /// Required when goal is "custom"; at most 10000 characters
    #[serde(default)]
    pub custom_prompt: Option<String>,
    /// "default", "longer" or "shorter" (default: "default")
    #[serde(default)]
    pub response_length: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddUrlInput {
    pub notebook_id: String,
    /// Web page or YouTube URL
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddTextInput {
    pub notebook_id: String,
    pub text: String,
    /// Source title (default: "Pasted Text")
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddDriveInput {
    pub notebook_id: String,
    /// Drive document id, as found in the document URL
    pub document_id: String,
    pub title: String,
    /// "doc", "slides", "sheets" or "pdf" (default: "doc")
    #[serde(default)]
    pub doc_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookQueryInput {
    pub notebook_id: String,
    pub query: String,
    /// Sources to ask over (default: all sources)
    #[serde(default)]
    pub source_ids: Option<Vec<String>>,
    /// Continue an earlier conversation
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceSyncInput {
    /// Source ids from source_list_drive
    #[serde(default)]
    pub source_ids: Vec<String>,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchStartInput {
    pub query: String,
    /// "web" or "drive" (default: "web")
    #[serde(default)]
    pub source: Option<String>,
    /// "fast" (~30s) or "deep" (3-5 min, web only) (default: "fast")
    #[serde(default)]
    pub mode: Option<String>,
    /// Existing notebook; a new one is created when absent
    #[serde(default)]
    pub notebook_id: Option<String>,
    /// Title of the created notebook (default: "Research: <query>")
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchStatusInput {
    pub notebook_id: String,
    /// Seconds between polls (default: 30)
    #[serde(default)]
    pub poll_interval: Option<u64>,
    /// Seconds to wait in total; 0 polls once (default: 300)
    #[serde(default)]
    pub max_wait: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchImportInput {
    pub notebook_id: String,
    pub task_id: String,
    /// Indices from research_status (default: import everything)
    #[serde(default)]
    pub source_indices: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AudioOverviewInput {
    pub notebook_id: String,
    /// Sources to include (default: all sources)
    #[serde(default)]
    pub source_ids: Option<Vec<String>>,
    /// "deep_dive", "brief", "critique" or "debate" (default: "deep_dive")
    #[serde(default)]
    pub format: Option<String>,
    /// "short", "default" or "long" (default: "default")
    #[serde(default)]
    pub length: Option<String>,
    /// BCP-47 code (default: "en")
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub focus_prompt: Option<String>,
    /// Must be true; show the settings to the user first
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoOverviewInput {
    pub notebook_id: String,
    #[serde(default)]
    pub source_ids: Option<Vec<String>>,
    /// "explainer" or "brief" (default: "explainer")
    #[serde(default)]
    pub format: Option<String>,
    /// "auto_select", "classic", "whiteboard", "kawaii", "anime", "watercolor",
    /// "retro_print", "heritage", "paper_craft" or "custom" (default: "auto_select")
    #[serde(default)]
    pub visual_style: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub focus_prompt: Option<String>,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StudioStatusInput {
    pub notebook_id: String,
    /// Only wait for this artifact
    #[serde(default)]
    pub artifact_id: Option<String>,
    /// Seconds between polls when waiting (default: 30)
    #[serde(default)]
    pub poll_interval: Option<u64>,
    /// Seconds to wait for generation to finish (default: 0, poll once)
    #[serde(default)]
    pub max_wait: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StudioDeleteInput {
    pub notebook_id: String,
    /// Artifact id from studio_status
    pub artifact_id: String,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SaveAuthTokensInput {
    /// Full Cookie header of a request to the notebook site
    pub cookies: String,
    /// Optional; derived from the landing page when absent
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Optional; derived from the landing page when absent
    #[serde(default)]
    pub session_id: Option<String>,
}

// =============================================================================
// REPLIES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookSummary {
    pub id: String,
    pub title: String,
    pub source_count: usize,
    pub url: String,
    /// "owned" or "shared_with_me"
    pub ownership: String,
    pub is_shared: bool,
}

impl From<&Notebook> for NotebookSummary {
    fn from(nb: &Notebook) -> Self {
        Self {
            id: nb.id.clone(),
            title: nb.title.clone(),
            source_count: nb.source_count,
            url: nb.url(),
            ownership: nb.ownership().name().to_string(),
            is_shared: nb.is_shared,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookListResponse {
    pub status: ToolStatus,
    pub count: usize,
    pub owned_count: usize,
    pub shared_count: usize,
    /// Owned notebooks that are shared with others
    pub shared_by_me_count: usize,
    pub notebooks: Vec<NotebookSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookRef {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookResponse {
    pub status: ToolStatus,
    pub notebook: NotebookRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotebookGetResponse {
    pub status: ToolStatus,
    /// Unmapped notebook record
    pub notebook: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceResponse {
    pub status: ToolStatus,
    pub source: AddedSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryResponse {
    pub status: ToolStatus,
    pub answer: String,
    /// Pass back to ask a follow-up in the same conversation
    pub conversation_id: String,
}

/// Reply of operations that only acknowledge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageResponse {
    pub status: ToolStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notebook_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatConfigureResponse {
    pub status: ToolStatus,
    pub notebook_id: String,
    pub goal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    pub response_length: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DriveSourceEntry {
    pub id: String,
    pub title: String,
    pub source_type: SourceType,
    pub drive_doc_id: Option<String>,
    /// None when freshness could not be determined
    pub is_fresh: Option<bool>,
    pub needs_sync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OtherSourceEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

impl From<SourceRef> for OtherSourceEntry {
    fn from(source: SourceRef) -> Self {
        Self {
            id: source.id,
            title: source.title,
            source_type: source.source_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DriveSummary {
    pub total_sources: usize,
    pub syncable_sources: usize,
    pub stale_sources: usize,
    pub other_sources: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceListDriveResponse {
    pub status: ToolStatus,
    pub notebook_id: String,
    pub summary: DriveSummary,
    pub syncable_sources: Vec<DriveSourceEntry>,
    pub other_sources: Vec<OtherSourceEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Synced,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncResult {
    pub source_id: String,
    pub status: SyncOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncSummary {
    pub total: usize,
    pub synced: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceSyncResponse {
    /// "success", or "partial" when any source failed
    pub status: ToolStatus,
    pub summary: SyncSummary,
    pub results: Vec<SyncResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchStartResponse {
    pub status: ToolStatus,
    pub task_id: String,
    pub notebook_id: String,
    pub notebook_url: String,
    pub query: String,
    pub source: ResearchSource,
    pub mode: ResearchDepth,
    pub created_notebook: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResearchState {
    InProgress,
    Completed,
    NoResearch,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchReport {
    pub status: ResearchState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_domain: Option<ResearchSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ResearchDepth>,
    pub source_count: usize,
    pub sources: Vec<DiscoveredSource>,
    pub summary: String,
    pub polls_made: u32,
    pub wait_time_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchStatusResponse {
    pub status: ToolStatus,
    pub research: ResearchReport,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchImportResponse {
    pub status: ToolStatus,
    pub imported_count: usize,
    pub total_available: usize,
    pub sources: Vec<AddedSource>,
    pub notebook_url: String,
}

/// Settings echoed back for the user to approve.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StudioSettings {
    pub notebook_id: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_style: Option<String>,
    pub language: String,
    /// "(none)" when empty
    pub focus_prompt: String,
    /// Explicit source ids, or "all sources"
    pub sources: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StudioCreateResponse {
    /// "pending_confirmation" until called with confirm=true
    pub status: ToolStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<StudioSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ArtifactKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_status: Option<ArtifactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notebook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StudioSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl StudioSummary {
    pub fn of(artifacts: &[StudioArtifact]) -> Self {
        Self {
            total: artifacts.len(),
            completed: artifacts
                .iter()
                .filter(|a| a.status == ArtifactStatus::Completed)
                .count(),
            in_progress: artifacts.iter().filter(|a| a.is_in_progress()).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StudioStatusResponse {
    pub status: ToolStatus,
    pub notebook_id: String,
    pub summary: StudioSummary,
    pub artifacts: Vec<StudioArtifact>,
    pub polls_made: u32,
    pub wait_time_seconds: f64,
    pub notebook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SaveAuthTokensResponse {
    pub status: ToolStatus,
    pub message: String,
    pub cache_path: String,
    pub cookie_count: usize,
}
