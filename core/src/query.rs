//! Ranked free-text queries over an [`InvertedIndex`].
//!
//! A document's score is the sum, over every (query term, matching posting)
//! pair, of `field weight * (1 + ln tf) * idf * boost`, where
//! `idf = ln(1 + N / df)` and `boost` depends on whether the dictionary term
//! matched exactly or only as a prefix of the typed word. Prefixes are tried
//! against both the stemmed dictionary and the unstemmed indexed words, so a
//! partly typed word keeps matching past the end of its stem.

use crate::document::Document;
use crate::error::ConfigError;
use crate::index::{DocId, Field, InvertedIndex, TermId};
use crate::tokenizer::analyze;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub title_weight: f32,
    pub categories_weight: f32,
    pub tags_weight: f32,
    pub excerpt_weight: f32,
    /// Multiplier for a dictionary term equal to the normalized query term.
    pub exact_boost: f32,
    /// Multiplier for a dictionary term that only starts with the typed word.
    pub prefix_boost: f32,
    /// Shorter words are matched exactly only.
    pub min_prefix_len: usize,
    /// Truncate results after this many hits.
    pub limit: Option<usize>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            title_weight: 10.0,
            categories_weight: 5.0,
            tags_weight: 3.0,
            excerpt_weight: 1.0,
            exact_boost: 100.0,
            prefix_boost: 10.0,
            min_prefix_len: 2,
            limit: None,
        }
    }
}

impl ScoringConfig {
    pub fn field_weight(&self, field: Field) -> f32 {
        match field {
            Field::Title => self.title_weight,
            Field::Categories => self.categories_weight,
            Field::Tags => self.tags_weight,
            Field::Excerpt => self.excerpt_weight,
        }
    }

    /// Weights and boosts must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("title_weight", self.title_weight),
            ("categories_weight", self.categories_weight),
            ("tags_weight", self.tags_weight),
            ("excerpt_weight", self.excerpt_weight),
            ("exact_boost", self.exact_boost),
            ("prefix_boost", self.prefix_boost),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub score: f32,
}

/// A hit resolved against the document store.
#[derive(Debug, Clone, Copy)]
pub struct ResultRef<'a> {
    pub doc: &'a Document,
    pub score: f32,
}

/// Hits ordered by descending score, ascending doc id on ties. Iterating
/// does not consume the results, so the sequence can be walked again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    hits: Vec<Hit>,
    total_hits: usize,
}

impl SearchResults {
    pub fn empty() -> Self { Self::default() }

    pub fn iter(&self) -> std::slice::Iter<'_, Hit> { self.hits.iter() }

    pub fn len(&self) -> usize { self.hits.len() }

    pub fn is_empty(&self) -> bool { self.hits.is_empty() }

    /// Number of matching documents before any limit was applied.
    pub fn total_hits(&self) -> usize { self.total_hits }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ { self.hits.iter().map(|h| h.doc_id) }

    pub fn documents<'a>(&'a self, index: &'a InvertedIndex) -> impl Iterator<Item = ResultRef<'a>> + 'a {
        self.hits
            .iter()
            .filter_map(move |h| index.doc(h.doc_id).map(|doc| ResultRef { doc, score: h.score }))
    }

    pub fn into_vec(self) -> Vec<Hit> { self.hits }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter { self.hits.iter() }
}

/// Query with the default scoring.
pub fn query(index: &InvertedIndex, text: &str) -> SearchResults {
    search(index, text, &ScoringConfig::default())
}

pub fn search(index: &InvertedIndex, text: &str, config: &ScoringConfig) -> SearchResults {
    let tokens = analyze(text, index.analyzer());
    if tokens.is_empty() || index.is_empty() {
        return SearchResults::empty();
    }

    let n = index.num_docs() as f32;
    let mut scores: HashMap<DocId, f32> = HashMap::new();
    // query terms in first-seen order, each with every word typed for it
    let mut words: Vec<(String, Vec<String>)> = Vec::new();
    for tok in tokens {
        match words.iter().position(|(term, _)| *term == tok.term) {
            Some(i) => {
                let surfaces = &mut words[i].1;
                if !surfaces.contains(&tok.surface) {
                    surfaces.push(tok.surface);
                }
            }
            None => words.push((tok.term, vec![tok.surface])),
        }
    }

    for (term, surfaces) in words {
        // dictionary terms hit by this query term; exact match wins over prefix
        let mut matched: BTreeMap<TermId, f32> = BTreeMap::new();
        if let Some(tid) = index.term_id(&term) {
            matched.insert(tid, config.exact_boost);
        }
        for surface in surfaces.iter().filter(|s| s.chars().count() >= config.min_prefix_len) {
            let prefixed = index
                .terms_with_prefix(surface)
                .map(|(_, tid)| tid)
                .chain(index.terms_with_surface_prefix(surface));
            for tid in prefixed {
                matched.entry(tid).or_insert(config.prefix_boost);
            }
        }

        for (tid, boost) in matched {
            let df_t = index.df(tid).max(1) as f32;
            let idf = (1.0 + n / df_t).ln();
            for p in index.postings_for(tid) {
                let tf = 1.0 + (p.tf.max(1) as f32).ln();
                let contrib = config.field_weight(p.field) * tf * idf * boost;
                *scores.entry(p.doc_id).or_insert(0.0) += contrib;
            }
        }
    }

    let mut hits: Vec<Hit> = scores.into_iter().map(|(doc_id, score)| Hit { doc_id, score }).collect();
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    let total_hits = hits.len();
    if let Some(limit) = config.limit {
        hits.truncate(limit);
    }
    tracing::debug!(query = text, total_hits, "search");
    SearchResults { hits, total_hits }
}
