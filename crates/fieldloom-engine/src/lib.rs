//! The field classification core.
//!
//! Everything here is pure, synchronous computation over in-memory values:
//! flatten a nested JSON item into dotted/indexed paths, compile user pattern
//! tokens into matchers, decide per path whether the value is chunked content
//! or metadata, compress metadata keys to leaf names, and split chosen text
//! into overlapping windows. I/O and orchestration live elsewhere.

pub mod chunk;
pub mod classify;
pub mod compress;
pub mod flatten;
pub mod pattern;
pub mod record;

pub use chunk::chunk_text;
pub use classify::{classify, transform_value, Classified, ClassifyConfig, ChunkSource};
pub use compress::compress_leaf_keys;
pub use flatten::flatten;
pub use pattern::{leaf_name, parse_token_list, Pattern, PatternSet};
pub use record::MetadataRecord;
