use std::path::PathBuf;

/// Failure to turn a store file into documents.
///
/// A store that parses to an empty array is not an error; callers get
/// `Ok(vec![])` and can tell the two situations apart.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store must be an array of records, found {found}")]
    NotAnArray { found: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f32 },
}
