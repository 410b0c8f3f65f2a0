//! Domain mappers: one pure function per operation over positional payloads.
//!
//! Mappers never fail. Short arrays and mistyped slots turn into defaults,
//! skipped entries, or `None`.

pub mod chat;
pub mod notebook;
pub mod positional;
pub mod research;
pub mod source;
pub mod studio;

pub use chat::map_chat_settings;
pub use notebook::{map_created_notebook, map_notebook_list, map_notebook_sources};
pub use positional::Positional;
pub use research::{map_imported_sources, map_research_poll, map_research_started};
pub use source::{map_added_source, map_freshness, map_synced_source};
pub use studio::{map_generation_ticket, map_studio_artifacts};
