use serde_json::Value;

use super::positional::{non_empty_str, truthy, Positional};
use crate::models::notebook::UNTITLED_NOTEBOOK;
use crate::models::{Notebook, Ownership, SourceRef, SourceType};

/// Catalog entries, whether or not the list comes wrapped in an outer array.
fn catalog_entries(result: &Value) -> &[Value] {
    match result.list_at(0) {
        Some(inner) => inner.items(),
        None => result.items(),
    }
}

fn listing_source(entry: &Value) -> Option<SourceRef> {
    if entry.items().len() < 2 {
        return None;
    }
    let id_slot = entry.at(0)?;
    let id = match id_slot {
        Value::Array(_) => non_empty_str(id_slot.at(0)),
        other => non_empty_str(Some(other)),
    }?;
    let title = entry.str_at(1).unwrap_or("Untitled").to_string();
    Some(SourceRef::bare(id, title))
}

/// Map the catalog listing: `[title, sources[], id, emoji, _, ownership[]]` per entry.
///
/// Entries without an id are dropped.
pub fn map_notebook_list(result: &Value) -> Vec<Notebook> {
    catalog_entries(result)
        .iter()
        .filter(|entry| entry.items().len() >= 3)
        .filter_map(|entry| {
            let id = non_empty_str(entry.at(2))?;
            let title = entry.str_at(0).unwrap_or("Untitled").to_string();
            let sources = entry
                .at(1)
                .map(|s| s.items())
                .unwrap_or(&[])
                .iter()
                .filter_map(listing_source)
                .collect();

            let mut notebook = Notebook::new(id, title, sources);
            if let Some(meta) = entry.list_at(5).filter(|m| !m.items().is_empty()) {
                notebook.is_owned = meta.int_at(0) == Some(Ownership::OWNED_CODE);
                if let Some(shared) = meta.at(1) {
                    notebook.is_shared = truthy(shared);
                }
            }
            Some(notebook)
        })
        .collect()
}

/// Map a create response, where the new id sits in slot 2.
pub fn map_created_notebook(result: &Value, title: &str) -> Option<Notebook> {
    if result.items().len() < 3 {
        return None;
    }
    let id = non_empty_str(result.at(2))?;
    let title = if title.is_empty() {
        UNTITLED_NOTEBOOK.to_string()
    } else {
        title.to_string()
    };
    Some(Notebook::new(id, title, Vec::new()))
}

fn detail_source(entry: &Value) -> Option<SourceRef> {
    if entry.items().len() < 3 {
        return None;
    }
    let id = non_empty_str(entry.path(&[0, 0]))?;
    let title = entry.str_at(1).unwrap_or("Untitled").to_string();

    let metadata = entry.at(2);
    let source_type = SourceType::from_code(metadata.and_then(|m| m.int_at(4)));
    let drive_doc_id = metadata
        .and_then(|m| m.list_at(0))
        .and_then(|doc| non_empty_str(doc.at(0)));

    Some(SourceRef::typed(id, title, source_type, drive_doc_id))
}

/// Map the notebook detail response to its typed source list.
///
/// The notebook record is usually wrapped: `[[title, sources[], id, ...]]`.
pub fn map_notebook_sources(result: &Value) -> Vec<SourceRef> {
    let notebook = match result.at(0) {
        Some(inner @ Value::Array(_)) => inner,
        Some(_) => result,
        None => return Vec::new(),
    };

    notebook
        .at(1)
        .map(|s| s.items())
        .unwrap_or(&[])
        .iter()
        .filter_map(detail_source)
        .collect()
}
