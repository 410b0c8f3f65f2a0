//! Operation ids and fixed wire constants of the batch-RPC interface.

use serde_json::Value;

pub const BATCH_PATH: &str = "/_/LabsTailwindUi/data/batchexecute";

pub const STREAM_QUERY_PATH: &str = "/_/LabsTailwindUi/data/google.internal.labs.tailwind.orchestration.v1.LabsTailwindOrchestrationService/GenerateFreeFormStreamed";

/// Marker in the first slot of every result triplet.
pub const RESULT_MARKER: &str = "wrb.fr";

/// Anti-scraping prefix in front of every response body.
pub const ANTI_XSSI_PREFIX: &str = ")]}'";

pub const DEFAULT_BUILD_LABEL: &str = "boq_labs-tailwind-frontend_20251221.14_p0";

// Notebooks
pub const LIST_NOTEBOOKS: &str = "wXbhsf";
pub const GET_NOTEBOOK: &str = "rLM1Ne";
pub const CREATE_NOTEBOOK: &str = "CCqFvf";
/// Also carries chat configuration updates.
pub const UPDATE_NOTEBOOK: &str = "s0tc2d";
pub const DELETE_NOTEBOOK: &str = "WWINqb";

// Sources
pub const ADD_SOURCE: &str = "izAoDd";
pub const CHECK_FRESHNESS: &str = "yR9Yof";
pub const SYNC_DRIVE: &str = "FLmJqe";

// Research
pub const START_FAST_RESEARCH: &str = "Ljjv0c";
pub const START_DEEP_RESEARCH: &str = "QA9ei";
pub const POLL_RESEARCH: &str = "e3bVqc";
pub const IMPORT_RESEARCH: &str = "LBwxtb";

// Studio
pub const CREATE_STUDIO: &str = "R7cb6c";
pub const POLL_STUDIO: &str = "gArtLc";
pub const DELETE_STUDIO: &str = "V5N4be";

/// One invocation of a named server operation.
///
/// `params` is position-addressed: its shape is operation specific and is
/// never validated by the codec.
#[derive(Debug, Clone)]
pub struct RpcCall {
    pub operation_id: &'static str,
    pub params: Value,
    /// Page path the call pretends to originate from; only used for server logs.
    pub path_hint: String,
}

impl RpcCall {
    pub fn new(operation_id: &'static str, params: Value) -> Self {
        Self {
            operation_id,
            params,
            path_hint: "/".to_string(),
        }
    }

    /// Attribute the call to a notebook page.
    pub fn on_notebook(mut self, notebook_id: &str) -> Self {
        self.path_hint = format!("/notebook/{notebook_id}");
        self
    }
}
