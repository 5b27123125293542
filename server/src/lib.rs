use anyhow::{Context, Result};
use axum::{extract::{rejection::PathRejection, Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sitesearch_core::{load_store, search, snippet, AnalyzerConfig, DocId, Document, InvertedIndex, ScoringConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Words of excerpt returned with each hit.
const SNIPPET_WORDS: usize = 20;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub title: String,
    pub url: String,
    pub excerpt: String,
    pub snippet: String,
    pub teaser: Option<String>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub num_docs: usize,
    pub num_terms: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
    pub scoring: Arc<ScoringConfig>,
}

pub struct AppConfig {
    pub store: PathBuf,
    pub analyzer: AnalyzerConfig,
    pub scoring: ScoringConfig,
}

/// Load the store, build the index once and wire up the routes.
pub fn build_app(config: AppConfig) -> Result<Router> {
    config.scoring.validate().context("invalid scoring config")?;
    let docs = load_store(&config.store).with_context(|| format!("loading store {}", config.store.display()))?;
    let index = InvertedIndex::build_with(docs, config.analyzer);
    Ok(router(AppState { index: Arc::new(index), scoring: Arc::new(config.scoring) }))
}

/// Read a scoring config from a JSON file; fields left out keep their defaults.
pub fn load_scoring(path: Option<&std::path::Path>) -> Result<ScoringConfig> {
    let Some(path) = path else { return Ok(ScoringConfig::default()) };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading scoring config {}", path.display()))?;
    let scoring: ScoringConfig = serde_json::from_str(&text).with_context(|| format!("parsing scoring config {}", path.display()))?;
    Ok(scoring)
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);
    let scoring = ScoringConfig { limit: Some(k), ..(*state.scoring).clone() };
    let found = search(&state.index, &params.q, &scoring);

    let analyzer = state.index.analyzer();
    let results: Vec<SearchHit> = found
        .documents(&state.index)
        .map(|r| SearchHit {
            doc_id: r.doc.id,
            score: r.score,
            title: r.doc.title.clone(),
            url: r.doc.url.clone(),
            excerpt: r.doc.excerpt.clone(),
            snippet: snippet(&r.doc.excerpt, &params.q, SNIPPET_WORDS, analyzer),
            teaser: r.doc.teaser.clone(),
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits = found.total_hits(), took_us = elapsed.as_micros() as u64, "search");
    Json(SearchResponse {
        query: params.q,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits: found.total_hits(),
        results,
    })
}

pub async fn doc_handler(State(state): State<AppState>, doc_id: Result<Path<DocId>, PathRejection>) -> Result<Json<Document>, (StatusCode, Json<serde_json::Value>)> {
    let Ok(Path(doc_id)) = doc_id else {
        return Err((StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": "invalid doc id" }))));
    };
    match state.index.doc(doc_id) {
        Some(doc) => Ok(Json(doc.clone())),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse { num_docs: state.index.num_docs(), num_terms: state.index.num_terms() })
}
