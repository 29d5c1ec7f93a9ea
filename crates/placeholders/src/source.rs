//! Record lookup for placeholder identifiers

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Anything placeholder identifiers can be resolved against.
///
/// Returns the rendered value, or `None` when the identifier does not resolve.
pub trait PlaceholderSource {
    fn lookup(&self, identifier: &str) -> Option<String>;
}

/// Resolve a dotted path against a JSON value.
///
/// Object keys are matched exactly and array elements are addressed by index.
/// A missing key or a `null` intermediate short-circuits to `None`.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn lookup_in_map(map: &Map<String, Value>, identifier: &str) -> Option<String> {
    // flattened records may carry the dotted name as a literal key
    if let Some(value) = map.get(identifier) {
        return Some(crate::render_value(value));
    }
    let (head, rest) = identifier.split_once('.')?;
    map.get(head)
        .and_then(|value| resolve_path(value, rest))
        .map(crate::render_value)
}

impl PlaceholderSource for Value {
    fn lookup(&self, identifier: &str) -> Option<String> {
        match self {
            Value::Object(map) => lookup_in_map(map, identifier),
            other => resolve_path(other, identifier).map(crate::render_value),
        }
    }
}

impl PlaceholderSource for Map<String, Value> {
    fn lookup(&self, identifier: &str) -> Option<String> {
        lookup_in_map(self, identifier)
    }
}

impl PlaceholderSource for HashMap<String, String> {
    fn lookup(&self, identifier: &str) -> Option<String> {
        self.get(identifier).cloned()
    }
}

impl PlaceholderSource for BTreeMap<String, String> {
    fn lookup(&self, identifier: &str) -> Option<String> {
        self.get(identifier).cloned()
    }
}

impl<T: PlaceholderSource + ?Sized> PlaceholderSource for &T {
    fn lookup(&self, identifier: &str) -> Option<String> {
        (**self).lookup(identifier)
    }
}
