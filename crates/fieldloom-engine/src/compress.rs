//! Metadata key compression to collision-safe leaf names.

use crate::pattern::leaf_name;
use crate::record::MetadataRecord;

/// Compress path-like metadata keys (`a.b.title`, `tags[0]`) to their leaf
/// name, lowercased, suffixing `_2`, `_3`, … on collision. Keys that are
/// already simple names, including user-mapped output keys, pass through
/// unchanged. Provenance follows each key through the rename.
pub fn compress_leaf_keys(record: &MetadataRecord) -> MetadataRecord {
    let mut out = MetadataRecord::new();

    for (key, value, source) in record.iter() {
        if key.contains('.') || key.contains('[') {
            let base = leaf_name(key);
            let mut candidate = base.clone();
            let mut suffix = 2;
            while out.contains_key(&candidate) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            out.insert(candidate, value.to_string(), source.to_string());
        } else {
            out.insert(key.to_string(), value.to_string(), source.to_string());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, &str)]) -> MetadataRecord {
        let mut r = MetadataRecord::new();
        for (key, value) in entries {
            r.insert(key.to_string(), value.to_string(), key.to_string());
        }
        r
    }

    #[test]
    fn colliding_leaves_get_numeric_suffixes() {
        let out = compress_leaf_keys(&record(&[("a.b.title", "one"), ("c.title", "two")]));
        assert_eq!(out.get("title"), Some("one"));
        assert_eq!(out.get("title_2"), Some("two"));
        assert_eq!(out.provenance("title_2"), Some("c.title"));
    }

    #[test]
    fn indexed_keys_strip_brackets() {
        let out = compress_leaf_keys(&record(&[("crawl.tags[0]", "a"), ("crawl.tags[1]", "b")]));
        assert_eq!(out.get("tags"), Some("a"));
        assert_eq!(out.get("tags_2"), Some("b"));
    }

    #[test]
    fn simple_keys_pass_through() {
        let out = compress_leaf_keys(&record(&[("title", "plain"), ("a.Title", "pathy")]));
        assert_eq!(out.get("title"), Some("plain"));
        assert_eq!(out.get("title_2"), Some("pathy"));
    }

    #[test]
    fn later_simple_key_overwrites_compressed_leaf() {
        // Only path-like keys dedupe; a simple key arriving after a
        // compressed one of the same leaf name overwrites it (last write
        // wins), it does not get a suffix.
        let out = compress_leaf_keys(&record(&[("a.Title", "pathy"), ("title", "plain")]));
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("title"), Some("plain"));
        assert_eq!(out.provenance("title"), Some("title"));
    }
}
