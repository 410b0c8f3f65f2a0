use serde_json::Value;

use super::positional::{non_empty_str, Positional};
use crate::models::{
    AddedSource, DiscoveredSource, ResearchDepth, ResearchHandle, ResearchPoll, ResearchSource,
    ResearchStatus, ResearchTask, ResultKind,
};

/// Map a start response: `[task_id, report_id?]`.
pub fn map_research_started(
    result: &Value,
    notebook_id: &str,
    query: &str,
    source: ResearchSource,
    depth: ResearchDepth,
) -> Option<ResearchHandle> {
    let task_id = non_empty_str(result.at(0))?;
    Some(ResearchHandle {
        task_id,
        report_id: non_empty_str(result.at(1)),
        notebook_id: notebook_id.to_string(),
        query: query.to_string(),
        source,
        depth,
    })
}

fn discovered_source(index: usize, entry: &Value) -> Option<DiscoveredSource> {
    if entry.items().len() < 3 {
        return None;
    }
    let text = |idx| entry.str_at(idx).unwrap_or_default().to_string();
    Some(DiscoveredSource {
        index,
        url: text(0),
        title: text(1),
        description: text(2),
        result_kind: ResultKind::from_code(entry.int_at(3).unwrap_or(1)),
    })
}

/// One `[task_id, task_info, timestamp]` record; timestamp-only rows are skipped.
fn research_task(record: &Value) -> Option<ResearchTask> {
    if record.items().len() < 3 {
        return None;
    }
    let task_id = record.str_at(0)?.to_string();
    let info = record.list_at(1).filter(|i| !i.items().is_empty())?;

    let query_info = info.at(1);
    let query = query_info
        .and_then(|q| q.str_at(0))
        .unwrap_or_default()
        .to_string();
    let source_domain = match query_info.and_then(|q| q.int_at(1)).unwrap_or(1) {
        1 => ResearchSource::Web,
        _ => ResearchSource::Drive,
    };
    let depth = if info.int_at(2) == Some(ResearchDepth::Deep.code()) {
        ResearchDepth::Deep
    } else {
        ResearchDepth::Fast
    };

    let (discovered, summary) = match info.at(3).filter(|b| b.items().len() >= 2) {
        Some(bundle) => {
            let discovered = bundle
                .list_at(0)
                .map(|list| list.items())
                .unwrap_or(&[])
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| discovered_source(idx, entry))
                .collect();
            (discovered, bundle.str_at(1).unwrap_or_default().to_string())
        }
        None => (Vec::new(), String::new()),
    };

    Some(ResearchTask {
        task_id,
        status: ResearchStatus::from_code(info.int_at(4)),
        query,
        source_domain,
        depth,
        discovered,
        summary,
    })
}

/// Map a research poll. The first task found is the most recent one.
pub fn map_research_poll(result: &Value) -> ResearchPoll {
    if result.items().is_empty() {
        return ResearchPoll::NotFound;
    }

    let records = match result.list_at(0) {
        Some(inner) if inner.at(0).is_some_and(Value::is_array) => inner,
        _ => result,
    };

    records
        .items()
        .iter()
        .find_map(research_task)
        .map_or(ResearchPoll::NotFound, ResearchPoll::Task)
}

/// Map an import response: a list of `[[id], title]`, possibly wrapped once.
pub fn map_imported_sources(result: &Value) -> Vec<AddedSource> {
    let entries = match result.list_at(0) {
        Some(inner) if inner.at(0).is_some_and(Value::is_array) => inner,
        _ => result,
    };

    entries
        .items()
        .iter()
        .filter(|entry| entry.items().len() >= 2)
        .filter_map(|entry| {
            let id = non_empty_str(entry.path(&[0, 0]))?;
            let title = entry.str_at(1).unwrap_or("Untitled").to_string();
            Some(AddedSource { id, title })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn poll_response(status: i64) -> Value {
        json!([[
            [
                "task-1",
                [
                    "nb-1",
                    ["rust async runtimes", 1],
                    1,
                    [
                        [
                            ["https://tokio.rs", "Tokio", "An async runtime", 1],
                            ["https://drive.google.com/open?id=doc9", "Notes", "", 2],
                            ["https://x", "bad"],
                            ["https://smol.rs", "smol", "Small runtime"]
                        ],
                        "Three runtimes dominate."
                    ],
                    status
                ],
                [1735000000, 0]
            ],
            [1735000001],
            [1735000002]
        ]])
    }

    #[test]
    fn test_poll_in_progress() {
        match map_research_poll(&poll_response(1)) {
            ResearchPoll::Task(task) => {
                assert_eq!(task.status, ResearchStatus::InProgress);
                assert_eq!(task.task_id, "task-1");
            }
            ResearchPoll::NotFound => panic!("expected task"),
        }
    }

    #[test]
    fn test_poll_completed_with_sources() {
        let ResearchPoll::Task(task) = map_research_poll(&poll_response(2)) else {
            panic!("expected task");
        };
        assert_eq!(task.status, ResearchStatus::Completed);
        assert_eq!(task.query, "rust async runtimes");
        assert_eq!(task.source_domain, ResearchSource::Web);
        assert_eq!(task.depth, ResearchDepth::Fast);
        assert_eq!(task.summary, "Three runtimes dominate.");

        let indices: Vec<usize> = task.discovered.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
        assert_eq!(task.discovered[1].result_kind, ResultKind::GoogleDoc);
        assert_eq!(task.discovered[2].result_kind, ResultKind::Web);
        assert_eq!(task.discovered[2].description, "Small runtime");
    }

    #[test]
    fn test_poll_deep_drive_codes() {
        let result = json!([["t", ["nb", ["q", 2], 5, [[], ""], 2], 0]]);
        let ResearchPoll::Task(task) = map_research_poll(&result) else {
            panic!("expected task");
        };
        assert_eq!(task.source_domain, ResearchSource::Drive);
        assert_eq!(task.depth, ResearchDepth::Deep);
        assert!(task.discovered.is_empty());
    }

    #[test]
    fn test_poll_without_tasks() {
        assert_eq!(map_research_poll(&json!([])), ResearchPoll::NotFound);
        assert_eq!(map_research_poll(&json!(null)), ResearchPoll::NotFound);
        assert_eq!(map_research_poll(&json!([[[1, 2, 3]]])), ResearchPoll::NotFound);
    }

    #[test]
    fn test_started() {
        let handle = map_research_started(
            &json!(["task-9", "report-3"]),
            "nb",
            "q",
            ResearchSource::Web,
            ResearchDepth::Deep,
        )
        .unwrap();
        assert_eq!(handle.task_id, "task-9");
        assert_eq!(handle.report_id.as_deref(), Some("report-3"));

        let fast = map_research_started(&json!(["t"]), "nb", "q", ResearchSource::Drive, ResearchDepth::Fast).unwrap();
        assert_eq!(fast.report_id, None);

        assert!(map_research_started(&json!([]), "nb", "q", ResearchSource::Web, ResearchDepth::Fast).is_none());
    }

    #[test]
    fn test_imported_sources_wrapped_and_flat() {
        let wrapped = json!([[[["s1"], "One"], [["s2"], "Two"], [[], "No id"]]]);
        let imported = map_imported_sources(&wrapped);
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[1].title, "Two");

        // An unwrapped list is indistinguishable from a wrapped one and gets unwrapped too.
        let flat = json!([[["s3"], "Three"]]);
        assert!(map_imported_sources(&flat).is_empty());
    }
}
