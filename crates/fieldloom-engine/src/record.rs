//! Metadata record with provenance.
//!
//! Keys keep their insertion order so overwrites and leaf compression are
//! deterministic; each key carries the flattened path it was derived from.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    /// (output key, value, source path), in insertion order.
    entries: Vec<(String, String, String)>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. Overwrites keep the key's original
    /// position, so iteration order stays stable (last write wins on the
    /// value and provenance).
    pub fn insert(&mut self, key: String, value: String, source_path: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _, _)| *k == key) {
            entry.1 = value;
            entry.2 = source_path;
        } else {
            self.entries.push((key, value, source_path));
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, v, _)| v.as_str())
    }

    /// Source path the given output key was derived from.
    pub fn provenance(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, _, p)| p.as_str())
    }

    /// Iterate `(key, value, source path)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries
            .iter()
            .map(|(k, v, p)| (k.as_str(), v.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot as a JSON object for the output row.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value, _) in &self.entries {
            map.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_position_and_updates_provenance() {
        let mut record = MetadataRecord::new();
        record.insert("title".into(), "one".into(), "a.title".into());
        record.insert("url".into(), "https://x".into(), "url".into());
        record.insert("title".into(), "two".into(), "b.title".into());

        let keys: Vec<&str> = record.iter().map(|(k, _, _)| k).collect();
        assert_eq!(keys, vec!["title", "url"]);
        assert_eq!(record.get("title"), Some("two"));
        assert_eq!(record.provenance("title"), Some("b.title"));
    }
}
