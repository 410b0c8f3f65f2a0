//! Studio tools: audio and video overview generation, status, deletion.

use std::sync::Arc;

use serde_json::json;

use crate::client::NotebookClient;
use crate::mcp::error::ToolError;
use crate::mcp::types::{
    AudioOverviewInput, MessageResponse, StudioCreateResponse, StudioDeleteInput,
    StudioSettings, StudioStatusInput, StudioStatusResponse, StudioSummary, ToolStatus,
    VideoOverviewInput, MAX_WAIT_SECS,
};
use crate::mcp::NblmServer;
use crate::models::{
    any_in_progress, notebook_url, ArtifactKind, AudioFormat, AudioLength, AudioOptions,
    GenerationTicket, VideoFormat, VideoOptions, VideoStyle,
};
use crate::poller::{poll_until, PollPolicy};
use crate::progress::ProgressReporter;

const DEFAULT_LANGUAGE: &str = "en";

/// Seconds between studio polls when the caller asks to wait.
const DEFAULT_STUDIO_INTERVAL: u64 = 30;

fn parse_or_default<T>(name: Option<&str>) -> Result<T, ToolError>
where
    T: std::str::FromStr<Err = crate::NblmError> + Default,
{
    match name {
        Some(name) => Ok(name.parse()?),
        None => Ok(T::default()),
    }
}

fn pending(kind: &str, settings: StudioSettings) -> StudioCreateResponse {
    StudioCreateResponse {
        status: ToolStatus::PendingConfirmation,
        message: format!("Please confirm these settings before creating the {kind} overview:"),
        settings: Some(settings),
        note: Some("Set confirm=true after user approves these settings.".into()),
        artifact_id: None,
        kind: None,
        generation_status: None,
        notebook_url: None,
    }
}

fn started(kind: ArtifactKind, label: &str, ticket: GenerationTicket) -> StudioCreateResponse {
    StudioCreateResponse {
        status: ToolStatus::Success,
        message: format!("{label} generation started. Use studio_status to check progress."),
        settings: None,
        note: None,
        artifact_id: ticket.artifact_id,
        kind: Some(kind),
        generation_status: Some(ticket.status),
        notebook_url: Some(notebook_url(&ticket.notebook_id)),
    }
}

fn settings_sources(source_ids: &Option<Vec<String>>) -> serde_json::Value {
    match source_ids {
        Some(ids) if !ids.is_empty() => json!(ids),
        _ => json!("all sources"),
    }
}

fn focus_label(focus_prompt: &str) -> String {
    if focus_prompt.is_empty() {
        "(none)".to_string()
    } else {
        focus_prompt.to_string()
    }
}

/// Explicit source ids, or every source of the notebook.
async fn resolve_sources(
    client: &NotebookClient,
    notebook_id: &str,
    source_ids: Option<Vec<String>>,
    kind: &str,
) -> Result<Vec<String>, ToolError> {
    let ids = match source_ids {
        Some(ids) => ids,
        None => client
            .get_notebook_sources(notebook_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .filter(|id| !id.is_empty())
            .collect(),
    };
    if ids.is_empty() {
        return Err(ToolError::not_found(
            format!("No sources found in notebook. Add sources before creating {kind} overview."),
            "Add a source with notebook_add_url, notebook_add_text or notebook_add_drive.",
        ));
    }
    Ok(ids)
}

impl NblmServer {
    /// Names are validated before the confirmation gate so the user approves valid settings.
    pub async fn handle_audio_overview_create(
        &self,
        input: AudioOverviewInput,
    ) -> Result<StudioCreateResponse, ToolError> {
        let options = AudioOptions {
            format: parse_or_default::<AudioFormat>(input.format.as_deref())?,
            length: parse_or_default::<AudioLength>(input.length.as_deref())?,
            language: input.language.unwrap_or_else(|| DEFAULT_LANGUAGE.into()),
            focus_prompt: input.focus_prompt.unwrap_or_default(),
        };

        if !input.confirm {
            return Ok(pending(
                "audio",
                StudioSettings {
                    notebook_id: input.notebook_id,
                    format: options.format.to_string(),
                    length: Some(options.length.to_string()),
                    visual_style: None,
                    language: options.language,
                    focus_prompt: focus_label(&options.focus_prompt),
                    sources: settings_sources(&input.source_ids),
                },
            ));
        }

        let client = self.client().await?;
        let source_ids =
            resolve_sources(&client, &input.notebook_id, input.source_ids, "audio").await?;
        let ticket = client
            .create_audio_overview(&input.notebook_id, &source_ids, options)
            .await?
            .ok_or_else(|| ToolError::failed("Failed to create audio overview"))?;

        Ok(started(ArtifactKind::Audio, "Audio", ticket))
    }

    pub async fn handle_video_overview_create(
        &self,
        input: VideoOverviewInput,
    ) -> Result<StudioCreateResponse, ToolError> {
        let options = VideoOptions {
            format: parse_or_default::<VideoFormat>(input.format.as_deref())?,
            visual_style: parse_or_default::<VideoStyle>(input.visual_style.as_deref())?,
            language: input.language.unwrap_or_else(|| DEFAULT_LANGUAGE.into()),
            focus_prompt: input.focus_prompt.unwrap_or_default(),
        };

        if !input.confirm {
            return Ok(pending(
                "video",
                StudioSettings {
                    notebook_id: input.notebook_id,
                    format: options.format.to_string(),
                    length: None,
                    visual_style: Some(options.visual_style.to_string()),
                    language: options.language,
                    focus_prompt: focus_label(&options.focus_prompt),
                    sources: settings_sources(&input.source_ids),
                },
            ));
        }

        let client = self.client().await?;
        let source_ids =
            resolve_sources(&client, &input.notebook_id, input.source_ids, "video").await?;
        let ticket = client
            .create_video_overview(&input.notebook_id, &source_ids, options)
            .await?
            .ok_or_else(|| ToolError::failed("Failed to create video overview"))?;

        Ok(started(ArtifactKind::Video, "Video", ticket))
    }

    /// List artifacts, optionally waiting until generation finishes.
    pub async fn handle_studio_status(
        &self,
        input: StudioStatusInput,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<StudioStatusResponse, ToolError> {
        let policy = PollPolicy::from_secs(
            input.poll_interval.unwrap_or(DEFAULT_STUDIO_INTERVAL),
            input.max_wait.unwrap_or(0).min(MAX_WAIT_SECS),
        );

        let client = self.client().await?;
        let client: &NotebookClient = &client;
        let notebook_id = input.notebook_id.as_str();
        let target = input.artifact_id.as_deref();

        let report = poll_until(
            policy,
            move || client.poll_studio(notebook_id),
            |artifacts| !any_in_progress(artifacts, target),
            progress.as_ref(),
        )
        .await?;

        Ok(StudioStatusResponse {
            status: ToolStatus::Success,
            summary: StudioSummary::of(&report.snapshot),
            polls_made: report.polls,
            wait_time_seconds: report.elapsed_secs(),
            artifacts: report.snapshot,
            notebook_url: notebook_url(&input.notebook_id),
            notebook_id: input.notebook_id,
        })
    }

    pub async fn handle_studio_delete(
        &self,
        input: StudioDeleteInput,
    ) -> Result<MessageResponse, ToolError> {
        if !input.confirm {
            return Err(ToolError::unconfirmed(
                "Deletion not confirmed. You must ask the user to confirm before deleting. Set confirm=true only after user approval.",
                Some("This action is IRREVERSIBLE. The artifact will be permanently deleted."),
                "First call studio_status to list artifacts with their IDs and titles.",
            ));
        }

        let deleted = self
            .client()
            .await?
            .delete_studio_artifact(&input.artifact_id)
            .await?;
        if !deleted {
            return Err(ToolError::failed("Failed to delete artifact"));
        }

        Ok(MessageResponse {
            status: ToolStatus::Success,
            message: format!(
                "Artifact {} has been permanently deleted.",
                input.artifact_id
            ),
            notebook_id: Some(input.notebook_id),
        })
    }
}
