use serde_json::json;
use uuid::Uuid;

use super::NotebookClient;
use crate::models::QueryAnswer;
use crate::rpc::extract::extract_stream_answer;
use crate::NblmError;

impl NotebookClient {
    /// Ask a question over a notebook's sources.
    ///
    /// Without `source_ids` every source of the notebook is used. A fresh
    /// conversation id is minted unless one is passed to continue a thread.
    /// The answer is empty when the stream carried none.
    pub async fn query(
        &self,
        notebook_id: &str,
        query_text: &str,
        source_ids: Option<Vec<String>>,
        conversation_id: Option<String>,
    ) -> Result<QueryAnswer, NblmError> {
        let source_ids = match source_ids {
            Some(ids) => ids,
            None => self
                .get_notebook_sources(notebook_id)
                .await?
                .into_iter()
                .map(|s| s.id)
                .collect(),
        };
        let conversation_id = conversation_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let sources: Vec<_> = source_ids.iter().map(|id| json!([[[id]]])).collect();
        let params = json!([sources, query_text, null, [2, null, [1]], conversation_id]);

        let chunks = self.session().stream(&params).await?;
        let answer = extract_stream_answer(&chunks).unwrap_or_default();

        Ok(QueryAnswer {
            answer,
            conversation_id,
        })
    }
}
