use serde_json::Value;

use super::positional::{non_empty_str, Positional};
use crate::models::{
    ArtifactKind, ArtifactStatus, GenerationOptions, GenerationTicket, StudioArtifact,
};

/// Slot holding the audio options block of an artifact.
const AUDIO_SLOT: usize = 6;
/// Slot holding the video options block of an artifact.
const VIDEO_SLOT: usize = 8;

/// Map a generation request response: `[[artifact_id, title, kind, sources, status, ...]]`.
pub fn map_generation_ticket(
    result: &Value,
    notebook_id: &str,
    options: GenerationOptions,
) -> Option<GenerationTicket> {
    let artifact = result.at(0)?;
    Some(GenerationTicket {
        artifact_id: non_empty_str(artifact.at(0)),
        notebook_id: notebook_id.to_string(),
        status: ArtifactStatus::from_code(artifact.int_at(4)),
        options,
    })
}

/// Durations arrive as integers or fractional seconds.
fn whole_seconds(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.round() as i64))
}

fn studio_artifact(entry: &Value) -> Option<StudioArtifact> {
    if entry.items().len() < 5 {
        return None;
    }
    let artifact_id = entry.str_at(0)?.to_string();
    let kind = ArtifactKind::from_code(entry.int_at(2));

    let (media_url, duration_seconds) = match kind {
        ArtifactKind::Audio => {
            let block = entry.list_at(AUDIO_SLOT);
            (
                block.and_then(|b| b.str_at(3)).map(str::to_string),
                block.and_then(|b| b.path(&[9, 0])).and_then(whole_seconds),
            )
        }
        ArtifactKind::Video => (
            entry
                .list_at(VIDEO_SLOT)
                .and_then(|b| b.str_at(3))
                .map(str::to_string),
            None,
        ),
        ArtifactKind::Unknown => (None, None),
    };

    Some(StudioArtifact {
        artifact_id,
        title: entry.str_at(1).unwrap_or_default().to_string(),
        kind,
        status: ArtifactStatus::from_code(entry.int_at(4)),
        media_url,
        duration_seconds,
    })
}

/// Map a studio poll into every non-suggested artifact of the notebook.
pub fn map_studio_artifacts(result: &Value) -> Vec<StudioArtifact> {
    let entries = match result.list_at(0) {
        Some(inner) => inner,
        None => result,
    };

    entries.items().iter().filter_map(studio_artifact).collect()
}
