pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod snippet;
pub mod store;
pub mod tokenizer;

pub use document::{Document, RawDocument};
pub use error::{ConfigError, LoadError};
pub use index::{DocId, Field, InvertedIndex, Posting, TermId};
pub use query::{query, search, Hit, ResultRef, ScoringConfig, SearchResults};
pub use snippet::snippet;
pub use store::{load_store, parse_store};
pub use tokenizer::{AnalyzerConfig, Token};
