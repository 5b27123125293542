use crate::document::Document;
use crate::tokenizer::{analyze, count_words, AnalyzerConfig};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Bound;

pub type TermId = u32;
pub type DocId = u32;

/// Document field a posting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Categories,
    Tags,
    Excerpt,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Categories, Field::Tags, Field::Excerpt];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Categories => "categories",
            Field::Tags => "tags",
            Field::Excerpt => "excerpt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub field: Field,
    /// Occurrences of the term in this field.
    pub tf: u32,
    pub first_position: u32,
}

/// Inverted index over a fixed document set.
///
/// Only [`InvertedIndex::build`] and [`InvertedIndex::build_with`] create one
/// and nothing mutates it afterwards, so it can be shared between threads
/// without locking.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    dictionary: BTreeMap<String, TermId>,
    /// Unstemmed word -> terms it was normalized to, for prefix matching.
    surfaces: BTreeMap<String, BTreeSet<TermId>>,
    df: Vec<u32>,
    postings: Vec<Vec<Posting>>, // indexed by TermId, sorted by (doc_id, field)
    docs: Vec<Document>,
    analyzer: AnalyzerConfig,
}

impl InvertedIndex {
    pub fn build(docs: Vec<Document>) -> Self {
        Self::build_with(docs, AnalyzerConfig::default())
    }

    /// Build the index. Document ids are reassigned to their position in
    /// `docs` so every posting refers to a stored document.
    pub fn build_with(docs: Vec<Document>, analyzer: AnalyzerConfig) -> Self {
        let mut dictionary: BTreeMap<String, TermId> = BTreeMap::new();
        let mut surfaces: BTreeMap<String, BTreeSet<TermId>> = BTreeMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut postings: Vec<Vec<Posting>> = Vec::new();
        let mut stored: Vec<Document> = Vec::with_capacity(docs.len());

        for (pos, mut doc) in docs.into_iter().enumerate() {
            let doc_id = pos as DocId;
            doc.id = doc_id;

            // (term, field) -> (tf, first position); BTreeMap keeps field order stable
            let mut counts: BTreeMap<(TermId, Field), (u32, u32)> = BTreeMap::new();
            for field in Field::ALL {
                let mut offset = 0usize;
                for segment in field_segments(&doc, field) {
                    for tok in analyze(segment, &analyzer) {
                        let position = offset + tok.position;
                        let next_id = dictionary.len() as TermId;
                        let tid = *dictionary.entry(tok.term).or_insert_with(|| {
                            df.push(0);
                            postings.push(Vec::new());
                            next_id
                        });
                        surfaces.entry(tok.surface).or_default().insert(tid);
                        let entry = counts.entry((tid, field)).or_insert((0, position as u32));
                        entry.0 += 1;
                    }
                    offset += count_words(segment);
                }
            }

            let mut seen_in_doc: HashSet<TermId> = HashSet::new();
            for ((tid, field), (tf, first_position)) in counts {
                if seen_in_doc.insert(tid) {
                    df[tid as usize] += 1;
                }
                postings[tid as usize].push(Posting { doc_id, field, tf, first_position });
            }
            stored.push(doc);
        }

        tracing::info!(num_docs = stored.len(), num_terms = dictionary.len(), "built index");
        Self { dictionary, surfaces, df, postings, docs: stored, analyzer }
    }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn analyzer(&self) -> &AnalyzerConfig { &self.analyzer }

    pub fn docs(&self) -> &[Document] { &self.docs }

    pub fn doc(&self, doc_id: DocId) -> Option<&Document> { self.docs.get(doc_id as usize) }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    /// Number of distinct documents containing the term.
    pub fn df(&self, term_id: TermId) -> u32 { self.df.get(term_id as usize).copied().unwrap_or(0) }

    pub fn postings_for(&self, term_id: TermId) -> &[Posting] {
        self.postings.get(term_id as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Postings for a normalized term, empty if the term is unknown.
    pub fn postings(&self, term: &str) -> &[Posting] {
        match self.term_id(term) {
            Some(tid) => self.postings_for(tid),
            None => &[],
        }
    }

    /// Dictionary terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ { self.dictionary.keys().map(String::as_str) }

    /// Dictionary terms starting with `prefix`, in lexicographic order.
    pub fn terms_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, TermId)> + 'a {
        self.dictionary
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(term, _)| term.starts_with(prefix))
            .map(|(term, tid)| (term.as_str(), *tid))
    }

    /// Terms whose unstemmed source word starts with `prefix`. A term may be
    /// yielded more than once.
    pub fn terms_with_surface_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = TermId> + 'a {
        self.surfaces
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(surface, _)| surface.starts_with(prefix))
            .flat_map(|(_, tids)| tids.iter().copied())
    }
}

fn field_segments(doc: &Document, field: Field) -> Vec<&str> {
    match field {
        Field::Title => vec![doc.title.as_str()],
        Field::Excerpt => vec![doc.excerpt.as_str()],
        Field::Tags => doc.tags.iter().map(String::as_str).collect(),
        Field::Categories => doc.categories.iter().map(String::as_str).collect(),
    }
}
