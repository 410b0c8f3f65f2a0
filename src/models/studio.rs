//! Studio artifacts: generated audio and video overviews.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::codes::{ArtifactKind, ArtifactStatus, AudioFormat, AudioLength, VideoFormat, VideoStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StudioArtifact {
    pub artifact_id: String,
    pub title: String,
    pub kind: ArtifactKind,
    pub status: ArtifactStatus,
    /// Playback URL once generation has finished.
    pub media_url: Option<String>,
    /// Audio only.
    pub duration_seconds: Option<i64>,
}

impl StudioArtifact {
    pub fn is_in_progress(&self) -> bool {
        self.status == ArtifactStatus::InProgress
    }
}

/// Options chosen for an audio overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioOptions {
    pub format: AudioFormat,
    pub length: AudioLength,
    pub language: String,
    pub focus_prompt: String,
}

/// Options chosen for a video overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoOptions {
    pub format: VideoFormat,
    pub visual_style: VideoStyle,
    pub language: String,
    pub focus_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationOptions {
    Audio(AudioOptions),
    Video(VideoOptions),
}

/// Returned once the server accepted a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationTicket {
    pub artifact_id: Option<String>,
    pub notebook_id: String,
    pub status: ArtifactStatus,
    pub options: GenerationOptions,
}

/// True while any artifact in `artifacts` (or the one named `target`) is still being generated.
pub fn any_in_progress(artifacts: &[StudioArtifact], target: Option<&str>) -> bool {
    artifacts
        .iter()
        .filter(|a| target.map_or(true, |id| a.artifact_id == id))
        .any(StudioArtifact::is_in_progress)
}
