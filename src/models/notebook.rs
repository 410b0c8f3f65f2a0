use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::source::SourceRef;

/// Public web address of the notebook application.
pub const NOTEBOOK_URL_BASE: &str = "https://notebooklm.google.com/notebook";

/// Title the service gives a notebook created without one.
pub const UNTITLED_NOTEBOOK: &str = "Untitled notebook";

/// Web address of a notebook.
pub fn notebook_url(notebook_id: &str) -> String {
    format!("{NOTEBOOK_URL_BASE}/{notebook_id}")
}

/// One entry of the notebook catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Notebook {
    pub id: String,
    pub title: String,
    /// Always equal to `sources.len()`.
    pub source_count: usize,
    pub sources: Vec<SourceRef>,
    /// False when the notebook was shared with the caller by someone else.
    pub is_owned: bool,
    /// True when an owned notebook is shared with others.
    pub is_shared: bool,
}

impl Notebook {
    pub fn new(id: String, title: String, sources: Vec<SourceRef>) -> Self {
        Self {
            id,
            title,
            source_count: sources.len(),
            sources,
            is_owned: true,
            is_shared: false,
        }
    }

    pub fn url(&self) -> String {
        notebook_url(&self.id)
    }

    pub fn ownership(&self) -> Ownership {
        if self.is_owned {
            Ownership::Owned
        } else {
            Ownership::SharedWithMe
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Owned,
    SharedWithMe,
}

impl Ownership {
    /// Wire code meaning "created by the caller".
    pub const OWNED_CODE: i64 = 1;

    pub fn name(self) -> &'static str {
        match self {
            Ownership::Owned => "owned",
            Ownership::SharedWithMe => "shared_with_me",
        }
    }
}
