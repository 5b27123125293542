use crate::document::{Document, RawDocument};
use crate::error::LoadError;
use crate::index::DocId;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;

lazy_static! {
    // `var store = [...]` as emitted by the site generator's search plugin
    static ref ASSIGNMENT: Regex =
        Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*").expect("valid regex");
}

/// Read a store file from disk. See [`parse_store`] for the accepted formats.
pub fn load_store<P: AsRef<Path>>(path: P) -> Result<Vec<Document>, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let docs = parse_store(&text)?;
    tracing::info!(path = %path.display(), num_docs = docs.len(), "loaded store");
    Ok(docs)
}

/// Parse the store: either a bare JSON array or a JavaScript assignment of
/// one. Records that are not objects are skipped; ids follow the order of the
/// records that were kept.
pub fn parse_store(text: &str) -> Result<Vec<Document>, LoadError> {
    let body = strip_assignment(text);
    let value: Value = serde_json::from_str(body)?;
    let records = match value {
        Value::Array(records) => records,
        other => return Err(LoadError::NotAnArray { found: json_kind(&other) }),
    };

    let mut docs = Vec::with_capacity(records.len());
    for (pos, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            tracing::warn!(position = pos, kind = json_kind(&record), "skipping store record that is not an object");
            continue;
        }
        let raw: RawDocument = serde_json::from_value(record)?;
        let doc = Document::from_raw(docs.len() as DocId, raw);
        if doc.url.is_empty() {
            tracing::warn!(doc_id = doc.id, title = %doc.title, "store record has no url");
        }
        docs.push(doc);
    }
    Ok(docs)
}

fn strip_assignment(text: &str) -> &str {
    let text = text.trim_start_matches('\u{feff}');
    let body = match ASSIGNMENT.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    body.trim_end().trim_end_matches(';').trim_end()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
