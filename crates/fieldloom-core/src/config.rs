//! Request-scoped configuration for the embedding pipelines.
//!
//! The HTTP layer collects credentials from headers and knobs from form
//! fields into a [`RawEmbedRequest`]; [`RawEmbedRequest::validate`] either
//! yields a fully-defaulted [`EmbedRequest`] or an enumerated list of
//! missing/invalid fields that the caller reports synchronously, before any
//! background work starts.

use std::collections::HashMap;

use serde::Deserialize;

/// Default window size for text chunking, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Default overlap between consecutive chunks, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;
/// Default length threshold above which a field is chunked.
pub const DEFAULT_THRESHOLD: usize = 70;
/// Default destination table.
pub const DEFAULT_TABLE: &str = "documents";
/// Default content field for the legacy fixed-field pipeline.
pub const DEFAULT_CONTENT_FIELD: &str = "captions";

/// How metadata keys are rendered in the output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKeyMode {
    /// Compress path-like keys to their collision-safe leaf name.
    Leaf,
    /// Keep full dotted/indexed paths as keys.
    Full,
}

impl MetaKeyMode {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("leaf") => MetaKeyMode::Leaf,
            Some(_) => MetaKeyMode::Full,
        }
    }
}

/// Destination coordinates for the row store.
#[derive(Debug, Clone)]
pub struct StoreTarget {
    pub supabase_url: String,
    pub supabase_key: String,
    pub table: String,
}

/// Raw, unvalidated request surface as it arrives over HTTP.
///
/// Credentials come from headers; everything else from the form body. All
/// fields are optional strings here so validation can report every problem
/// at once instead of failing on the first.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawEmbedRequest {
    #[serde(skip)]
    pub openai_key: Option<String>,
    #[serde(skip)]
    pub supabase_url: Option<String>,
    #[serde(skip)]
    pub supabase_key: Option<String>,

    pub json_url: Option<String>,
    pub content_field: Option<String>,
    pub chunk_size: Option<String>,
    pub chunk_overlap: Option<String>,
    pub supabase_table: Option<String>,
    pub metadata: Option<String>,
    pub threshold: Option<String>,
    pub force_chunk_keys: Option<String>,
    pub force_meta_keys: Option<String>,
    pub exclude_chunk_keys: Option<String>,
    pub exclude_meta_keys: Option<String>,
    pub meta_key_mode: Option<String>,
}

/// Why a request was rejected before background work started.
#[derive(Debug, Default)]
pub struct ValidationFailure {
    pub missing: Vec<&'static str>,
    pub invalid: Vec<&'static str>,
}

impl ValidationFailure {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Fully validated and defaulted configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct EmbedRequest {
    pub openai_key: String,
    pub target: StoreTarget,
    pub file_url: String,
    pub content_field: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub threshold: usize,
    /// Raw token lists; compiled into patterns by the engine.
    pub force_chunk_keys: String,
    pub force_meta_keys: String,
    pub exclude_chunk_keys: String,
    pub exclude_meta_keys: String,
    /// Output key → source path.
    pub metadata_map: HashMap<String, String>,
    pub meta_key_mode: MetaKeyMode,
}

impl RawEmbedRequest {
    /// Validate required identifiers and numeric knobs.
    ///
    /// Missing credentials/source URL and unparsable numeric fields are
    /// collected into one [`ValidationFailure`]. A malformed `metadata` map
    /// degrades to empty rather than rejecting the request.
    pub fn validate(self) -> Result<EmbedRequest, ValidationFailure> {
        let mut failure = ValidationFailure::default();

        let required = [
            ("x-openai-api-key", &self.openai_key),
            ("x-supabase-url", &self.supabase_url),
            ("x-supabase-key", &self.supabase_key),
            ("json_url", &self.json_url),
        ];
        for (name, value) in required {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                failure.missing.push(name);
            }
        }

        let chunk_size = parse_knob(&self.chunk_size, DEFAULT_CHUNK_SIZE)
            .unwrap_or_else(|| {
                failure.invalid.push("chunk_size");
                DEFAULT_CHUNK_SIZE
            });
        let chunk_overlap = parse_knob(&self.chunk_overlap, DEFAULT_CHUNK_OVERLAP)
            .unwrap_or_else(|| {
                failure.invalid.push("chunk_overlap");
                DEFAULT_CHUNK_OVERLAP
            });
        let threshold = parse_knob(&self.threshold, DEFAULT_THRESHOLD).unwrap_or_else(|| {
            failure.invalid.push("threshold");
            DEFAULT_THRESHOLD
        });
        if chunk_size == 0 {
            failure.invalid.push("chunk_size");
        }

        if !failure.is_empty() {
            return Err(failure);
        }

        let metadata_map = self
            .metadata
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .and_then(|m| serde_json::from_str::<HashMap<String, String>>(m).ok())
            .unwrap_or_default();

        Ok(EmbedRequest {
            openai_key: self.openai_key.unwrap_or_default(),
            target: StoreTarget {
                supabase_url: self.supabase_url.unwrap_or_default(),
                supabase_key: self.supabase_key.unwrap_or_default(),
                table: self
                    .supabase_table
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            },
            file_url: self.json_url.unwrap_or_default(),
            content_field: self
                .content_field
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_FIELD.to_string()),
            chunk_size,
            chunk_overlap,
            threshold,
            force_chunk_keys: self.force_chunk_keys.unwrap_or_default(),
            force_meta_keys: self.force_meta_keys.unwrap_or_default(),
            exclude_chunk_keys: self.exclude_chunk_keys.unwrap_or_default(),
            exclude_meta_keys: self.exclude_meta_keys.unwrap_or_default(),
            metadata_map,
            meta_key_mode: MetaKeyMode::parse(self.meta_key_mode.as_deref()),
        })
    }
}

fn parse_knob(raw: &Option<String>, default: usize) -> Option<usize> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Some(default),
        Some(v) => v.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_raw() -> RawEmbedRequest {
        RawEmbedRequest {
            openai_key: Some("sk-test".into()),
            supabase_url: Some("https://db.example.com".into()),
            supabase_key: Some("anon".into()),
            json_url: Some("https://files.example.com/data.json".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_applied() {
        let req = base_raw().validate().unwrap();
        assert_eq!(req.chunk_size, 500);
        assert_eq!(req.chunk_overlap, 50);
        assert_eq!(req.threshold, 70);
        assert_eq!(req.target.table, "documents");
        assert_eq!(req.content_field, "captions");
        assert_eq!(req.meta_key_mode, MetaKeyMode::Leaf);
    }

    #[test]
    fn missing_fields_enumerated() {
        let raw = RawEmbedRequest {
            json_url: Some("https://x".into()),
            ..Default::default()
        };
        let failure = raw.validate().unwrap_err();
        assert_eq!(
            failure.missing,
            vec!["x-openai-api-key", "x-supabase-url", "x-supabase-key"]
        );
    }

    #[test]
    fn unparsable_knobs_enumerated() {
        let mut raw = base_raw();
        raw.chunk_size = Some("lots".into());
        raw.threshold = Some("-3".into());
        let failure = raw.validate().unwrap_err();
        assert_eq!(failure.invalid, vec!["chunk_size", "threshold"]);
    }

    #[test]
    fn malformed_metadata_map_degrades_to_empty() {
        let mut raw = base_raw();
        raw.metadata = Some("{not json".into());
        let req = raw.validate().unwrap();
        assert!(req.metadata_map.is_empty());
    }

    #[test]
    fn meta_key_mode_parsing() {
        assert_eq!(MetaKeyMode::parse(None), MetaKeyMode::Leaf);
        assert_eq!(MetaKeyMode::parse(Some("leaf")), MetaKeyMode::Leaf);
        assert_eq!(MetaKeyMode::parse(Some("path")), MetaKeyMode::Full);
    }
}
