use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::codes::SourceType;

/// A source attached to a notebook.
///
/// The catalog listing only carries `id` and `title`; the type fields are
/// filled in from the notebook detail call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceRef {
    pub id: String,
    pub title: String,
    pub source_type: SourceType,
    pub drive_doc_id: Option<String>,
    /// Implies `drive_doc_id.is_some()`.
    pub can_sync: bool,
}

impl SourceRef {
    /// Source known only by id and title.
    pub fn bare(id: String, title: String) -> Self {
        Self {
            id,
            title,
            source_type: SourceType::Unknown,
            drive_doc_id: None,
            can_sync: false,
        }
    }

    pub fn typed(id: String, title: String, source_type: SourceType, drive_doc_id: Option<String>) -> Self {
        let can_sync = drive_doc_id.is_some() && source_type.is_drive_backed();
        Self {
            id,
            title,
            source_type,
            drive_doc_id,
            can_sync,
        }
    }
}

/// Source created by an add or import call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AddedSource {
    pub id: String,
    pub title: String,
}

/// Outcome of re-syncing a Drive source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyncedSource {
    pub id: Option<String>,
    pub title: String,
    /// Server timestamp of the sync, in seconds.
    pub synced_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_sync_requires_drive_id_and_type() {
        let doc = SourceRef::typed("s".into(), "t".into(), SourceType::GoogleDocs, Some("d".into()));
        assert!(doc.can_sync);

        let no_id = SourceRef::typed("s".into(), "t".into(), SourceType::GoogleDocs, None);
        assert!(!no_id.can_sync);

        let text = SourceRef::typed("s".into(), "t".into(), SourceType::PastedText, Some("d".into()));
        assert!(!text.can_sync);
    }
}
