use crate::index::DocId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One record as it appears in the generated store. Every field is optional
/// and a value of the wrong JSON type is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub teaser: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Image shown next to the result by the UI; never indexed.
    pub teaser: Option<String>,
}

impl Document {
    /// Apply defaults to a raw record. Tags and categories are trimmed and
    /// de-duplicated, keeping the first occurrence.
    pub fn from_raw(id: DocId, raw: RawDocument) -> Self {
        Self {
            id,
            title: raw.title.unwrap_or_default(),
            excerpt: raw.excerpt.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            tags: dedup_labels(raw.tags),
            categories: dedup_labels(raw.categories),
            teaser: raw.teaser.filter(|t| !t.trim().is_empty()),
        }
    }
}

fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() || out.iter().any(|l| l == label) {
            continue;
        }
        out.push(label.to_string());
    }
    out
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}
