//! Transcript archive generation: a JSON array of transcript-like records
//! becomes a zip with one text document per record plus a CSV summary.

use std::io::{Cursor, Write};

use fieldloom_core::{Error, Result};
use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Strip filesystem-hostile characters and cap length.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' | '\''))
        .collect::<String>()
        .trim()
        .chars()
        .take(50)
        .collect()
}

/// `channel_name` → `Channel Name`.
fn format_key(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_value(key: &str, value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if key == "videoId" && !text.is_empty() {
        return format!("https://www.youtube.com/watch?v={text}");
    }
    text
}

/// Build the archive. Returns `(archive_name, zip_bytes)`.
///
/// The archive is named after the first record's `channelName`. Duplicate
/// record titles get `_2`, `_3`, … suffixes so every document filename is
/// unique.
pub fn generate_archive(records: &[Value]) -> Result<(String, Vec<u8>)> {
    if records.is_empty() {
        return Err(Error::Docs(
            "Invalid JSON payload. Must be a non-empty list.".into(),
        ));
    }

    let archive_name = records[0]
        .get("channelName")
        .and_then(Value::as_str)
        .map(sanitize_filename)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "output_docs".to_string());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut used_titles: Vec<String> = Vec::new();
    for record in records {
        let title = record
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Untitled");
        let base = {
            let safe = sanitize_filename(title);
            if safe.is_empty() {
                "Untitled".to_string()
            } else {
                safe
            }
        };
        let safe_title = if used_titles.contains(&base) {
            let mut n = 2;
            let mut candidate = format!("{base}_{n}");
            while used_titles.contains(&candidate) {
                n += 1;
                candidate = format!("{base}_{n}");
            }
            candidate
        } else {
            base
        };
        used_titles.push(safe_title.clone());

        writer
            .start_file(format!("{safe_title}.txt"), options)
            .map_err(|e| Error::Docs(e.to_string()))?;
        writer.write_all(render_document(title, record).as_bytes())?;
    }

    writer
        .start_file("all_data.csv", options)
        .map_err(|e| Error::Docs(e.to_string()))?;
    writer.write_all(&render_summary_csv(records)?)?;

    let cursor = writer.finish().map_err(|e| Error::Docs(e.to_string()))?;
    Ok((archive_name, cursor.into_inner()))
}

fn render_document(title: &str, record: &Value) -> String {
    let mut doc = String::new();
    doc.push_str(title);
    doc.push('\n');
    doc.push_str(&"=".repeat(title.chars().count().max(1)));
    doc.push_str("\n\n");

    if let Value::Object(map) = record {
        for (key, value) in map {
            doc.push_str(&format!("{}: {}\n", format_key(key), format_value(key, value)));
        }
    }
    doc
}

/// Columns come from the first record; later records fill matching columns
/// and leave the rest blank.
fn render_summary_csv(records: &[Value]) -> Result<Vec<u8>> {
    let headers: Vec<String> = match &records[0] {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    };

    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    csv_writer
        .write_record(&headers)
        .map_err(|e| Error::Docs(e.to_string()))?;

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| {
                record
                    .get(h)
                    .map(|v| match v {
                        Value::Null => String::new(),
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default()
            })
            .collect();
        csv_writer
            .write_record(&row)
            .map_err(|e| Error::Docs(e.to_string()))?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| Error::Docs(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;

    fn archive_names(bytes: &[u8]) -> Vec<String> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn archive_contains_one_doc_per_record_plus_csv() {
        let records = vec![
            json!({"channelName": "My Channel", "title": "First", "videoId": "abc"}),
            json!({"channelName": "My Channel", "title": "Second", "videoId": "def"}),
        ];
        let (name, bytes) = generate_archive(&records).unwrap();
        assert_eq!(name, "My Channel");
        assert_eq!(
            archive_names(&bytes),
            vec!["First.txt", "Second.txt", "all_data.csv"]
        );
    }

    #[test]
    fn duplicate_titles_get_suffixes() {
        let records = vec![
            json!({"title": "Same"}),
            json!({"title": "Same"}),
            json!({"title": "Same"}),
        ];
        let (name, bytes) = generate_archive(&records).unwrap();
        assert_eq!(name, "output_docs");
        assert_eq!(
            archive_names(&bytes),
            vec!["Same.txt", "Same_2.txt", "Same_3.txt", "all_data.csv"]
        );
    }

    #[test]
    fn document_body_formats_keys_and_video_ids() {
        let records = vec![json!({
            "title": "Talk",
            "channel_name": "chan",
            "videoId": "dQw4w9WgXcQ",
            "views": 42,
            "notes": null,
        })];
        let (_, bytes) = generate_archive(&records).unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut body = String::new();
        zip.by_name("Talk.txt").unwrap().read_to_string(&mut body).unwrap();

        assert!(body.starts_with("Talk\n"));
        assert!(body.contains("Channel Name: chan"));
        assert!(body.contains("Videoid: https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(body.contains("Views: 42"));
        assert!(body.contains("Notes: \n"));
    }

    #[test]
    fn csv_uses_first_record_columns() {
        let records = vec![
            json!({"title": "A", "views": 1}),
            json!({"title": "B", "extra": "ignored"}),
        ];
        let (_, bytes) = generate_archive(&records).unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut csv_text = String::new();
        zip.by_name("all_data.csv").unwrap().read_to_string(&mut csv_text).unwrap();

        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines[0], "title,views");
        assert_eq!(lines[1], "A,1");
        assert_eq!(lines[2], "B,");
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(generate_archive(&[]).is_err());
    }

    #[test]
    fn sanitize_strips_hostile_characters() {
        assert_eq!(sanitize_filename("a/b\\c:d*e?\"f<g>h|i'"), "abcdefghi");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
    }
}
