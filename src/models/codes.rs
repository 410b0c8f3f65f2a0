//! Integer wire codes and their caller-facing names.
//!
//! Every enum here maps to a fixed integer on the wire. Caller-selectable
//! enums parse from their snake_case name and reject anything else with a
//! validation error listing the accepted names. Read-only enums fall back to
//! `Unknown` for codes the client has not seen.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::NblmError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.name()).collect()
            }
        }

        impl std::str::FromStr for $name {
            type Err = NblmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(NblmError::invalid_choice($field, other, &Self::names())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

wire_enum! {
    /// Podcast-style conversation format.
    AudioFormat, field = "format" {
        DeepDive = 1 => "deep_dive",
        Brief = 2 => "brief",
        Critique = 3 => "critique",
        Debate = 4 => "debate",
    }
}

wire_enum! {
    AudioLength, field = "length" {
        Short = 1 => "short",
        Default = 2 => "default",
        Long = 3 => "long",
    }
}

wire_enum! {
    VideoFormat, field = "format" {
        Explainer = 1 => "explainer",
        Brief = 2 => "brief",
    }
}

wire_enum! {
    VideoStyle, field = "visual_style" {
        AutoSelect = 1 => "auto_select",
        Custom = 2 => "custom",
        Classic = 3 => "classic",
        Whiteboard = 4 => "whiteboard",
        Kawaii = 5 => "kawaii",
        Anime = 6 => "anime",
        Watercolor = 7 => "watercolor",
        RetroPrint = 8 => "retro_print",
        Heritage = 9 => "heritage",
        PaperCraft = 10 => "paper_craft",
    }
}

wire_enum! {
    /// Conversational goal of a notebook's chat.
    ChatGoal, field = "goal" {
        Default = 1 => "default",
        /// Free-form instructions, sent alongside the code.
        Custom = 2 => "custom",
        LearningGuide = 3 => "learning_guide",
    }
}

wire_enum! {
    ResponseLength, field = "response_length" {
        Default = 1 => "default",
        Longer = 4 => "longer",
        Shorter = 5 => "shorter",
    }
}

wire_enum! {
    /// Where a research task looks for sources.
    ResearchSource, field = "source" {
        Web = 1 => "web",
        Drive = 2 => "drive",
    }
}

wire_enum! {
    ResearchDepth, field = "mode" {
        Fast = 1 => "fast",
        Deep = 5 => "deep",
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat::DeepDive
    }
}

impl Default for AudioLength {
    fn default() -> Self {
        AudioLength::Default
    }
}

impl Default for VideoFormat {
    fn default() -> Self {
        VideoFormat::Explainer
    }
}

impl Default for VideoStyle {
    fn default() -> Self {
        VideoStyle::AutoSelect
    }
}

impl Default for ChatGoal {
    fn default() -> Self {
        ChatGoal::Default
    }
}

impl Default for ResponseLength {
    fn default() -> Self {
        ResponseLength::Default
    }
}

impl Default for ResearchSource {
    fn default() -> Self {
        ResearchSource::Web
    }
}

impl Default for ResearchDepth {
    fn default() -> Self {
        ResearchDepth::Fast
    }
}

/// Drive document type as named by callers adding a Drive source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DriveDocType {
    #[default]
    Doc,
    Slides,
    Sheets,
    Pdf,
}

impl DriveDocType {
    pub const ALL: &'static [DriveDocType] = &[
        DriveDocType::Doc,
        DriveDocType::Slides,
        DriveDocType::Sheets,
        DriveDocType::Pdf,
    ];

    pub const fn mime_type(self) -> &'static str {
        match self {
            DriveDocType::Doc => "application/vnd.google-apps.document",
            DriveDocType::Slides => "application/vnd.google-apps.presentation",
            DriveDocType::Sheets => "application/vnd.google-apps.spreadsheet",
            DriveDocType::Pdf => "application/pdf",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DriveDocType::Doc => "doc",
            DriveDocType::Slides => "slides",
            DriveDocType::Sheets => "sheets",
            DriveDocType::Pdf => "pdf",
        }
    }
}

impl std::str::FromStr for DriveDocType {
    type Err = NblmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "doc" | "docs" => Ok(DriveDocType::Doc),
            "slides" => Ok(DriveDocType::Slides),
            "sheets" => Ok(DriveDocType::Sheets),
            "pdf" => Ok(DriveDocType::Pdf),
            _ => Err(NblmError::invalid_choice(
                "doc_type",
                s,
                &["doc", "slides", "sheets", "pdf"],
            )),
        }
    }
}

/// Workspace document type of a notebook source (`metadata[4]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    GoogleDocs,
    /// Slides and Sheets share one code.
    GoogleSlidesSheets,
    PastedText,
    Unknown,
}

impl SourceType {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => SourceType::GoogleDocs,
            Some(2) => SourceType::GoogleSlidesSheets,
            Some(4) => SourceType::PastedText,
            _ => SourceType::Unknown,
        }
    }

    /// Only Drive-backed documents can be re-synced.
    pub fn is_drive_backed(self) -> bool {
        matches!(self, SourceType::GoogleDocs | SourceType::GoogleSlidesSheets)
    }
}

/// Kind of a source discovered by research.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Web,
    GoogleDoc,
    GoogleSlides,
    DeepReport,
    GoogleSheets,
    Unknown,
}

impl ResultKind {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ResultKind::Web,
            2 => ResultKind::GoogleDoc,
            3 => ResultKind::GoogleSlides,
            5 => ResultKind::DeepReport,
            8 => ResultKind::GoogleSheets,
            _ => ResultKind::Unknown,
        }
    }

    /// Mime type used when importing a Drive result; `None` for web results.
    pub fn import_mime_type(self) -> Option<&'static str> {
        match self {
            ResultKind::Web => None,
            ResultKind::GoogleSlides => Some("application/vnd.google-apps.presentation"),
            ResultKind::GoogleSheets => Some("application/vnd.google-apps.spreadsheet"),
            _ => Some("application/vnd.google-apps.document"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStatus {
    InProgress,
    Completed,
}

impl ResearchStatus {
    pub fn from_code(code: Option<i64>) -> Self {
        if code == Some(2) {
            ResearchStatus::Completed
        } else {
            ResearchStatus::InProgress
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Audio,
    Video,
    Unknown,
}

impl ArtifactKind {
    pub const AUDIO_CODE: i64 = 1;
    pub const VIDEO_CODE: i64 = 3;

    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(Self::AUDIO_CODE) => ArtifactKind::Audio,
            Some(Self::VIDEO_CODE) => ArtifactKind::Video,
            _ => ArtifactKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    InProgress,
    Completed,
    Unknown,
}

impl ArtifactStatus {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => ArtifactStatus::InProgress,
            Some(3) => ArtifactStatus::Completed,
            _ => ArtifactStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_codes_are_preserved() {
        assert_eq!(AudioFormat::Debate.code(), 4);
        assert_eq!(AudioLength::Long.code(), 3);
        assert_eq!(VideoFormat::Brief.code(), 2);
        assert_eq!(VideoStyle::PaperCraft.code(), 10);
        assert_eq!(ChatGoal::LearningGuide.code(), 3);
        assert_eq!(ResponseLength::Shorter.code(), 5);
        assert_eq!(ResearchDepth::Deep.code(), 5);
        assert_eq!(ResearchSource::Drive.code(), 2);
    }

    #[test]
    fn test_names_match_serde() {
        for style in VideoStyle::ALL {
            let serialized = serde_json::to_value(style).unwrap();
            assert_eq!(serialized, style.name());
            assert_eq!(VideoStyle::from_code(style.code()), Some(*style));
        }
        for goal in ChatGoal::ALL {
            assert_eq!(serde_json::to_value(goal).unwrap(), goal.name());
        }
        for format in AudioFormat::ALL {
            assert_eq!(serde_json::to_value(format).unwrap(), format.name());
        }
    }

    #[test]
    fn test_invalid_name_lists_accepted() {
        let err = AudioFormat::from_str("podcast").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid format 'podcast'. Must be one of: deep_dive, brief, critique, debate"
        );
    }

    #[test]
    fn test_drive_doc_type_accepts_docs_alias() {
        assert_eq!(DriveDocType::from_str("docs").unwrap(), DriveDocType::Doc);
        assert_eq!(
            DriveDocType::from_str("Slides").unwrap().mime_type(),
            "application/vnd.google-apps.presentation"
        );
        assert!(DriveDocType::from_str("video").is_err());
    }

    #[test]
    fn test_read_only_codes_fall_back() {
        assert_eq!(SourceType::from_code(Some(4)), SourceType::PastedText);
        assert_eq!(SourceType::from_code(Some(9)), SourceType::Unknown);
        assert_eq!(SourceType::from_code(None), SourceType::Unknown);
        assert_eq!(ResultKind::from_code(8), ResultKind::GoogleSheets);
        assert_eq!(ResultKind::from_code(4), ResultKind::Unknown);
        assert_eq!(ResearchStatus::from_code(Some(1)), ResearchStatus::InProgress);
        assert_eq!(ResearchStatus::from_code(None), ResearchStatus::InProgress);
        assert_eq!(ArtifactStatus::from_code(Some(3)), ArtifactStatus::Completed);
        assert_eq!(ArtifactStatus::from_code(Some(2)), ArtifactStatus::Unknown);
        assert_eq!(ArtifactKind::from_code(Some(3)), ArtifactKind::Video);
    }

    #[test]
    fn test_import_mime_types() {
        assert_eq!(ResultKind::Web.import_mime_type(), None);
        assert_eq!(
            ResultKind::GoogleSheets.import_mime_type(),
            Some("application/vnd.google-apps.spreadsheet")
        );
        assert_eq!(
            ResultKind::Unknown.import_mime_type(),
            Some("application/vnd.google-apps.document")
        );
    }
}
