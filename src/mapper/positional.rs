//! Safe positional reads over schema-less nested arrays.
//!
//! Every read returns `None` (or an empty slice) on a short array or a slot
//! of the wrong type, so mappers never index out of bounds.

use serde_json::Value;

pub trait Positional {
    /// Slot `idx` of an array; `None` when not an array or too short.
    fn at(&self, idx: usize) -> Option<&Value>;

    /// Follow a chain of indices.
    fn path(&self, idxs: &[usize]) -> Option<&Value>;

    /// Elements of an array, or an empty slice for anything else.
    fn items(&self) -> &[Value];

    fn str_at(&self, idx: usize) -> Option<&str> {
        self.at(idx).and_then(Value::as_str)
    }

    fn int_at(&self, idx: usize) -> Option<i64> {
        self.at(idx).and_then(Value::as_i64)
    }

    fn list_at(&self, idx: usize) -> Option<&Value> {
        self.at(idx).filter(|v| v.is_array())
    }
}

impl Positional for Value {
    fn at(&self, idx: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(idx))
    }

    fn path(&self, idxs: &[usize]) -> Option<&Value> {
        idxs.iter().try_fold(self, |node, &idx| node.at(idx))
    }

    fn items(&self) -> &[Value] {
        self.as_array().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Loose truthiness the service relies on: null, `false`, zero and empty
/// strings or containers are all "absent".
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// A non-empty array, or `None`.
pub fn non_empty_list(value: &Value) -> Option<&Value> {
    Some(value).filter(|v| !v.items().is_empty())
}

/// String slot that is present and non-empty.
pub fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
