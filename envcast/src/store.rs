//! Default value store
//!
//! Defaults are kept in a tree of maps keyed by lower-cased segments. A dotted
//! key such as `"Database.Host"` is stored as `{"database": {"host": ...}}`.

use crate::value::{Map, Value};
use serde::Serialize;

/// Case-insensitive tree of registered default values.
///
/// ```rust
/// use envcast::{DefaultStore, Value};
///
/// let mut store = DefaultStore::new();
/// store.set_default("Server.Port", 8080);
///
/// assert_eq!(store.get_path("server.port"), Some(&Value::Int(8080)));
/// assert!(store.get("server").unwrap().is_map());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DefaultStore {
    root: Map,
}

impl DefaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `key`.
    ///
    /// The key is lower-cased and split on `.`; every segment but the last
    /// names a nested map, created on demand. An intermediate segment that
    /// currently holds a non-map value is overwritten with an empty map.
    /// Map values have their keys lower-cased recursively before storage.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        let key = key.to_lowercase();
        let value = insensitivise(value.into());
        log::trace!("registering default for '{}' ({})", key, value.kind());

        let path: Vec<&str> = key.split('.').collect();
        let (last, parents) = match path.split_last() {
            Some(split) => split,
            None => return,
        };
        let deepest = deep_search(&mut self.root, parents);
        deepest.insert((*last).to_string(), value);
    }

    /// Literal lookup of `key` in the top-level map. Dots are not traversed.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(&key.to_lowercase())
    }

    /// Lookup of a dotted `key` through the nested maps.
    ///
    /// Returns `None` when a segment is missing or an intermediate segment is
    /// not a map.
    pub fn get_path(&self, key: &str) -> Option<&Value> {
        let key = key.to_lowercase();
        let mut segments = key.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }

    pub fn as_map(&self) -> &Map {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Dump the whole tree as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.root).unwrap_or_default()
    }
}

/// Lower-case every key of a map value, recursively.
///
/// Non-map values are returned untouched. When two keys differ only by case,
/// the one sorting last wins.
pub fn insensitivise(value: Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), insensitivise(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Walk `root` along `path`, returning the map at the end.
///
/// Missing segments are created as empty maps and non-map values found along
/// the way are replaced by empty maps, so this always succeeds and may modify
/// `root`.
pub(crate) fn deep_search<'a>(mut root: &'a mut Map, path: &[&str]) -> &'a mut Map {
    for segment in path {
        let slot = root
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Map(Map::new()));
        if !slot.is_map() {
            log::debug!(
                "discarding {} default at '{}' to make room for nested keys",
                slot.kind(),
                segment
            );
        }
        root = ensure_map(slot);
    }
    root
}

fn ensure_map(slot: &mut Value) -> &mut Map {
    if !slot.is_map() {
        *slot = Value::Map(Map::new());
    }
    match slot {
        Value::Map(map) => map,
        _ => unreachable!("slot was just replaced with a map"),
    }
}
