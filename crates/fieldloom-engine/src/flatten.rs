//! Recursive flattening of nested JSON values into path → string pairs.
//!
//! Object fields append `.<field>` (bare `<field>` at the root), array
//! elements append `[<index>]`. Leaves are stringified; `null` becomes the
//! empty string. Output order follows the source structure, so downstream
//! iteration is deterministic.

use serde_json::Value;

/// Flatten `value` into `(path, stringified leaf)` pairs.
///
/// Terminates on any finite JSON value; parsed JSON is always acyclic.
/// Every leaf maps to exactly one path, and paths are unique per item.
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    walk(value, "", &mut out);
    out
}

fn walk(value: &Value, path: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                walk(child, &child_path, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &format!("{path}[{index}]"), out);
            }
        }
        _ => out.push((path.to_string(), stringify(value))),
    }
}

/// Stringify a JSON value the way the classifier sees it: native scalars
/// directly, `null` as empty, containers as serialized JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.to_string()),
    }
}
