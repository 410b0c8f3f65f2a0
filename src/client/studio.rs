use serde_json::{json, Value};
use tracing::info;

use super::NotebookClient;
use crate::mapper;
use crate::models::{
    ArtifactKind, AudioOptions, GenerationOptions, GenerationTicket, StudioArtifact, VideoOptions,
};
use crate::rpc::{ops, RpcCall};
use crate::NblmError;

/// Server-side filter hiding suggested artifacts that were never generated.
const HIDE_SUGGESTED: &str = "NOT artifact.status = \"ARTIFACT_STATUS_SUGGESTED\"";

/// `[[[id]], ...]`
fn nested_sources(source_ids: &[String]) -> Vec<Value> {
    source_ids.iter().map(|id| json!([[id]])).collect()
}

/// `[[id], ...]`
fn simple_sources(source_ids: &[String]) -> Vec<Value> {
    source_ids.iter().map(|id| json!([id])).collect()
}

/// Params of an audio overview request.
pub fn audio_params(notebook_id: &str, source_ids: &[String], options: &AudioOptions) -> Value {
    let audio_options = json!([
        null,
        [
            options.focus_prompt,
            options.length.code(),
            null,
            simple_sources(source_ids),
            options.language,
            null,
            options.format.code()
        ]
    ]);
    json!([
        [2],
        notebook_id,
        [
            null, null,
            ArtifactKind::AUDIO_CODE,
            nested_sources(source_ids),
            null, null,
            audio_options
        ]
    ])
}

/// Params of a video overview request.
pub fn video_params(notebook_id: &str, source_ids: &[String], options: &VideoOptions) -> Value {
    let video_options = json!([
        null, null,
        [
            simple_sources(source_ids),
            options.language,
            options.focus_prompt,
            null,
            options.format.code(),
            options.visual_style.code()
        ]
    ]);
    json!([
        [2],
        notebook_id,
        [
            null, null,
            ArtifactKind::VIDEO_CODE,
            nested_sources(source_ids),
            null, null, null, null,
            video_options
        ]
    ])
}

impl NotebookClient {
    async fn create_studio(
        &self,
        notebook_id: &str,
        params: Value,
        options: GenerationOptions,
    ) -> Result<Option<GenerationTicket>, NblmError> {
        let call = RpcCall::new(ops::CREATE_STUDIO, params).on_notebook(notebook_id);
        let ticket = self
            .invoke_json(call)
            .await?
            .and_then(|result| mapper::map_generation_ticket(&result, notebook_id, options));
        if let Some(t) = &ticket {
            info!(notebook_id, artifact_id = ?t.artifact_id, "Studio generation requested");
        }
        Ok(ticket)
    }

    pub async fn create_audio_overview(
        &self,
        notebook_id: &str,
        source_ids: &[String],
        options: AudioOptions,
    ) -> Result<Option<GenerationTicket>, NblmError> {
        let params = audio_params(notebook_id, source_ids, &options);
        self.create_studio(notebook_id, params, GenerationOptions::Audio(options))
            .await
    }

    pub async fn create_video_overview(
        &self,
        notebook_id: &str,
        source_ids: &[String],
        options: VideoOptions,
    ) -> Result<Option<GenerationTicket>, NblmError> {
        let params = video_params(notebook_id, source_ids, &options);
        self.create_studio(notebook_id, params, GenerationOptions::Video(options))
            .await
    }

    /// Every generated or generating artifact of a notebook.
    pub async fn poll_studio(&self, notebook_id: &str) -> Result<Vec<StudioArtifact>, NblmError> {
        let call = RpcCall::new(ops::POLL_STUDIO, json!([[2], notebook_id, HIDE_SUGGESTED]))
            .on_notebook(notebook_id);
        Ok(self
            .invoke_json(call)
            .await?
            .map(|result| mapper::map_studio_artifacts(&result))
            .unwrap_or_default())
    }

    pub async fn delete_studio_artifact(&self, artifact_id: &str) -> Result<bool, NblmError> {
        let call = RpcCall::new(ops::DELETE_STUDIO, json!([[2], artifact_id]));
        let deleted = self.invoke(call).await?.is_some();
        if deleted {
            info!(artifact_id, "Studio artifact deleted");
        }
        Ok(deleted)
    }
}
