//! Per-path classification: chunk, metadata, or dropped.
//!
//! Precedence, evaluated independently per flattened path:
//! excludes beat forces beat the default-by-length rule, and excludes are
//! per-category (a path can be force-chunked while excluded from metadata).
//! A path matched by both exclude sets is dropped outright.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::flatten::flatten;
use crate::pattern::{leaf_name, PatternSet};
use crate::record::MetadataRecord;

/// One field selected for chunking: origin path plus its full text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSource {
    pub path: String,
    pub text: String,
}

/// Compiled rule sets for one run.
#[derive(Debug, Default)]
pub struct ClassifyConfig {
    pub threshold: usize,
    pub force_chunk: PatternSet,
    pub force_meta: PatternSet,
    pub exclude_chunk: PatternSet,
    pub exclude_meta: PatternSet,
    /// Output key → source path, applied after per-path classification.
    pub output_map: HashMap<String, String>,
}

/// Classification result for one item.
#[derive(Debug, Default)]
pub struct Classified {
    pub chunk_sources: Vec<ChunkSource>,
    pub metadata: MetadataRecord,
}

/// Classify every leaf of `item`. Pure function; never fails.
pub fn classify(item: &Value, cfg: &ClassifyConfig) -> Classified {
    let flat = flatten(item);
    let mut out = Classified::default();

    for (path, text) in &flat {
        let ex_chunk = cfg.exclude_chunk.matches(path);
        let ex_meta = cfg.exclude_meta.matches(path);

        if ex_chunk && ex_meta {
            continue;
        }

        if cfg.force_chunk.matches(path) && !ex_chunk {
            if !text.trim().is_empty() {
                out.chunk_sources.push(ChunkSource {
                    path: path.clone(),
                    text: text.clone(),
                });
            }
            continue;
        }

        if cfg.force_meta.matches(path) && !ex_meta {
            out.metadata.insert(path.clone(), text.clone(), path.clone());
            continue;
        }

        if !ex_chunk && text.chars().count() > cfg.threshold {
            if !text.trim().is_empty() {
                out.chunk_sources.push(ChunkSource {
                    path: path.clone(),
                    text: text.clone(),
                });
            }
        } else if !ex_meta {
            out.metadata.insert(path.clone(), text.clone(), path.clone());
        }
    }

    apply_output_map(&flat, cfg, &mut out.metadata);
    out
}

/// Apply the explicit output-key map on top of the classified metadata.
///
/// Mappings are applied in sorted key order so overwrites are deterministic.
fn apply_output_map(flat: &[(String, String)], cfg: &ClassifyConfig, meta: &mut MetadataRecord) {
    let mut mappings: Vec<(&String, &String)> = cfg.output_map.iter().collect();
    mappings.sort();

    for (out_key, source_path) in mappings {
        let Some((resolved, value)) = resolve_source_path(flat, source_path) else {
            continue;
        };
        if cfg.exclude_meta.matches(&resolved) {
            continue;
        }
        let transformed = transform_value(out_key, &value);
        meta.insert(out_key.clone(), transformed, resolved);
    }
}

/// Resolve a requested source path against the flattened item.
///
/// Exact case-insensitive match wins. Failing that, if the requested path's
/// leaf segment matches exactly one flattened path, that match is used. This
/// fallback is heuristic: with several near-matches whose uniqueness differs
/// across items in one batch, it can silently pick a different field per
/// item. The behavior is kept as-is; anything ambiguous is skipped.
fn resolve_source_path(flat: &[(String, String)], source_path: &str) -> Option<(String, String)> {
    if let Some((path, value)) = flat
        .iter()
        .find(|(path, _)| path.eq_ignore_ascii_case(source_path))
    {
        return Some((path.clone(), value.clone()));
    }

    let target_leaf = leaf_name(source_path);
    if target_leaf.is_empty() {
        return None;
    }
    let mut candidates = flat.iter().filter(|(path, _)| leaf_name(path) == target_leaf);
    match (candidates.next(), candidates.next()) {
        (Some((path, value)), None) => Some((path.clone(), value.clone())),
        _ => None,
    }
}

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-]{11}$").unwrap());

/// Expand recognized identifier-style values; pass everything else through.
pub fn transform_value(out_key: &str, value: &str) -> String {
    let key = out_key.to_ascii_lowercase();
    if (key == "youtube_id" || key == "video_id") && VIDEO_ID.is_match(value) {
        return format!("https://www.youtube.com/watch?v={value}");
    }
    value.to_string()
}
