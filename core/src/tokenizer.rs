use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Options for the analysis pipeline. The index keeps the config it was
/// built with and applies it to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub stem: bool,
    pub remove_stopwords: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { stem: true, remove_stopwords: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Normalized form stored in the index.
    pub term: String,
    /// Lower-cased form before stemming, used for prefix matching.
    pub surface: String,
    pub position: usize,
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

fn fold_apostrophes(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
        other => other,
    }
}

fn normalize(text: &str) -> String {
    text.nfkc().map(fold_apostrophes).collect::<String>().to_lowercase()
}

/// Number of words in `text`, stopwords included; one past the last
/// position [`analyze`] can report.
pub fn count_words(text: &str) -> usize {
    RE.find_iter(&normalize(text)).count()
}

/// Tokenize with the default pipeline: NFKC, lowercase, stopword removal and stemming.
pub fn tokenize(text: &str) -> Vec<Token> {
    analyze(text, &AnalyzerConfig::default())
}

/// Tokenize `text` into normalized terms. Positions count every word,
/// stopwords included, so they line up with the source text.
pub fn analyze(text: &str, config: &AnalyzerConfig) -> Vec<Token> {
    let normalized = normalize(text);
    let mut tokens = Vec::new();
    for (pos, mat) in RE.find_iter(&normalized).enumerate() {
        let word = mat.as_str().trim_end_matches('\'');
        if config.remove_stopwords && is_stopword(word) { continue; }
        let term = if config.stem { STEMMER.stem(word).into_owned() } else { word.to_string() };
        if term.is_empty() { continue; }
        tokens.push(Token { term, surface: word.to_string(), position: pos });
    }
    tokens
}
