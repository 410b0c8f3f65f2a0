use serde_json::Value;

use super::positional::{non_empty_str, Positional};
use crate::models::{AddedSource, SyncedSource};

/// Map an add-source response: `[[[[id], title, ...]]]`.
pub fn map_added_source(result: &Value, fallback_title: &str) -> Option<AddedSource> {
    let entry = result.path(&[0, 0])?;
    let id = non_empty_str(entry.path(&[0, 0]))?;
    let title = entry.str_at(1).unwrap_or(fallback_title).to_string();
    Some(AddedSource { id, title })
}

/// Map a freshness check: `[[null, fresh, [id]]]`. `Some(false)` means stale.
pub fn map_freshness(result: &Value) -> Option<bool> {
    result.path(&[0, 1]).and_then(Value::as_bool)
}

/// Map a Drive sync response: `[[[id], title, metadata[], ...]]`.
///
/// The sync timestamp sits at `metadata[3][1][0]`.
pub fn map_synced_source(result: &Value) -> Option<SyncedSource> {
    let entry = result.list_at(0).filter(|e| e.items().len() >= 3)?;
    Some(SyncedSource {
        id: non_empty_str(entry.path(&[0, 0])),
        title: entry.str_at(1).unwrap_or("Unknown").to_string(),
        synced_at: entry.path(&[2, 3, 1, 0]).and_then(Value::as_i64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_added_source() {
        let result = json!([[[["src-7"], "Example Domain", [null, 12]]]]);
        assert_eq!(
            map_added_source(&result, "Pasted Text"),
            Some(AddedSource {
                id: "src-7".into(),
                title: "Example Domain".into()
            })
        );
    }

    #[test]
    fn test_added_source_title_fallback_and_missing_id() {
        let untitled = json!([[[["src-8"]]]]);
        assert_eq!(map_added_source(&untitled, "Notes").unwrap().title, "Notes");
        assert_eq!(map_added_source(&json!([[[null, "t"]]]), "x"), None);
        assert_eq!(map_added_source(&json!([]), "x"), None);
    }

    #[test]
    fn test_freshness() {
        assert_eq!(map_freshness(&json!([[null, true, ["s"]]])), Some(true));
        assert_eq!(map_freshness(&json!([[null, false, ["s"]]])), Some(false));
        assert_eq!(map_freshness(&json!([[null]])), None);
        assert_eq!(map_freshness(&json!([])), None);
    }

    #[test]
    fn test_synced_source() {
        let result = json!([[["s1"], "Spec", [null, null, null, [null, [1735000000, 0]]], [null, 2]]]);
        assert_eq!(
            map_synced_source(&result),
            Some(SyncedSource {
                id: Some("s1".into()),
                title: "Spec".into(),
                synced_at: Some(1735000000),
            })
        );
    }

    #[test]
    fn test_synced_source_without_timestamp() {
        let result = json!([[["s1"], null, []]]);
        let synced = map_synced_source(&result).unwrap();
        assert_eq!(synced.title, "Unknown");
        assert_eq!(synced.synced_at, None);
        assert_eq!(map_synced_source(&json!([[["s1"], "t"]])), None);
    }
}
