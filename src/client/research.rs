use serde_json::{json, Value};
use tracing::info;

use super::NotebookClient;
use crate::mapper;
use crate::models::{
    AddedSource, DiscoveredSource, ResearchDepth, ResearchHandle, ResearchPoll, ResearchSource,
};
use crate::rpc::{ops, RpcCall};
use crate::NblmError;

/// Deep research only searches the web.
pub fn validate_research(source: ResearchSource, depth: ResearchDepth) -> Result<(), NblmError> {
    if depth == ResearchDepth::Deep && source == ResearchSource::Drive {
        return Err(NblmError::Validation(
            "Deep Research only supports Web sources. Use mode='fast' for Drive.".into(),
        ));
    }
    Ok(())
}

/// Import entry for one discovered source.
///
/// Drive results carry their document id in the URL; when it cannot be found
/// the result is imported as a web link.
pub fn import_entry(source: &DiscoveredSource) -> Value {
    let drive = source
        .result_kind
        .import_mime_type()
        .and_then(|mime| source.drive_doc_id().map(|id| (id, mime)));

    match drive {
        Some((doc_id, mime)) => json!([
            [doc_id, mime, 1, source.title],
            null, null, null, null, null, null, null, null, null,
            2
        ]),
        None => json!([
            null, null, [source.url, source.title],
            null, null, null, null, null, null, null,
            2
        ]),
    }
}

impl NotebookClient {
    pub async fn start_research(
        &self,
        notebook_id: &str,
        query: &str,
        source: ResearchSource,
        depth: ResearchDepth,
    ) -> Result<Option<ResearchHandle>, NblmError> {
        validate_research(source, depth)?;

        let (operation, params) = match depth {
            ResearchDepth::Fast => (
                ops::START_FAST_RESEARCH,
                json!([[query, source.code()], null, 1, notebook_id]),
            ),
            ResearchDepth::Deep => (
                ops::START_DEEP_RESEARCH,
                json!([null, [1], [query, source.code()], 5, notebook_id]),
            ),
        };
        let call = RpcCall::new(operation, params).on_notebook(notebook_id);

        let handle = self.invoke_json(call).await?.and_then(|result| {
            mapper::map_research_started(&result, notebook_id, query, source, depth)
        });
        if let Some(h) = &handle {
            info!(task_id = %h.task_id, mode = %depth, "Research started");
        }
        Ok(handle)
    }

    /// Latest research task of a notebook.
    pub async fn poll_research(&self, notebook_id: &str) -> Result<ResearchPoll, NblmError> {
        let call = RpcCall::new(ops::POLL_RESEARCH, json!([null, null, notebook_id]))
            .on_notebook(notebook_id);
        Ok(self
            .invoke_json(call)
            .await?
            .map(|result| mapper::map_research_poll(&result))
            .unwrap_or(ResearchPoll::NotFound))
    }

    /// Import discovered sources. An empty selection makes no request.
    pub async fn import_research_sources(
        &self,
        notebook_id: &str,
        task_id: &str,
        sources: &[DiscoveredSource],
    ) -> Result<Vec<AddedSource>, NblmError> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<Value> = sources.iter().map(import_entry).collect();
        let call = RpcCall::new(
            ops::IMPORT_RESEARCH,
            json!([null, [1], task_id, notebook_id, entries]),
        )
        .on_notebook(notebook_id);

        Ok(self
            .invoke_json(call)
            .await?
            .map(|result| mapper::map_imported_sources(&result))
            .unwrap_or_default())
    }
}
