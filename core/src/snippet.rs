use crate::tokenizer::{analyze, AnalyzerConfig};
use std::collections::HashSet;

const ELLIPSIS: &str = "…";

/// A window of `window` words from `excerpt`, starting a few words before the
/// first word that matches the query under `analyzer`. Falls back to the
/// leading words when nothing matches. Plain text only.
pub fn snippet(excerpt: &str, query: &str, window: usize, analyzer: &AnalyzerConfig) -> String {
    let words: Vec<&str> = excerpt.split_whitespace().collect();
    if words.is_empty() || window == 0 {
        return String::new();
    }

    let wanted: HashSet<String> = analyze(query, analyzer).into_iter().map(|t| t.term).collect();
    let first_match = if wanted.is_empty() {
        None
    } else {
        words
            .iter()
            .position(|w| analyze(w, analyzer).iter().any(|t| wanted.contains(&t.term)))
    };

    let start = match first_match {
        Some(idx) => idx.saturating_sub(window / 4).min(words.len().saturating_sub(window)),
        None => 0,
    };
    let end = (start + window).min(words.len());

    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.push_str(&words[start..end].join(" "));
    if end < words.len() {
        out.push_str(ELLIPSIS);
    }
    out
}
