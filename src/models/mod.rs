//! Domain records produced by the mappers.

pub mod chat;
pub mod codes;
pub mod notebook;
pub mod research;
pub mod source;
pub mod studio;

pub use chat::{ChatSettings, QueryAnswer, MAX_CUSTOM_PROMPT_CHARS};
pub use codes::{
    ArtifactKind, ArtifactStatus, AudioFormat, AudioLength, ChatGoal, DriveDocType, ResearchDepth,
    ResearchSource, ResearchStatus, ResponseLength, ResultKind, SourceType, VideoFormat, VideoStyle,
};
pub use notebook::{notebook_url, Notebook, Ownership};
pub use research::{DiscoveredSource, ResearchHandle, ResearchPoll, ResearchTask};
pub use source::{AddedSource, SourceRef, SyncedSource};
pub use studio::{
    any_in_progress, AudioOptions, GenerationOptions, GenerationTicket, StudioArtifact, VideoOptions,
};
