use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server::{build_app, load_scoring, AppConfig};
use sitesearch_core::{AnalyzerConfig, ScoringConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

const STORE: &str = r#"var store = [{
        "title": "Welcome to Jekyll!",
        "excerpt":"You’ll find this post in your _posts directory. You can rebuild the site in many different ways, but the most common way is to run jekyll serve.",
        "categories": ["jekyll","update"],
        "tags": [],
        "url": "/jekyll/update/welcome-to-jekyll/",
        "teaser": null
      },{
    "title": "Contact",
    "excerpt":"Contact us below for opportunities:     Email: jigarkumar.desai@hmh-cdi.org  ","url": "http://localhost:4000/contact/"
  },{
    "title": "Research",
    "excerpt":"The research in our laboratory focuses on the mucosal and systemic complement system.","url": "http://localhost:4000/research/"
  }]
"#;

fn write_store(dir: &Path, contents: &str) -> AppConfig {
    let store = dir.join("lunr-store.js");
    fs::write(&store, contents).unwrap();
    AppConfig { store, analyzer: AnalyzerConfig::default(), scoring: ScoringConfig::default() }
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn call_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = call(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), STORE)).unwrap();

    let (status, json) = call_json(app, "/search?q=jekyll&k=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"].as_u64().unwrap(), 1);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["doc_id"].as_u64().unwrap(), 0);
    assert_eq!(arr[0]["url"], "/jekyll/update/welcome-to-jekyll/");
    assert!(arr[0]["score"].as_f64().unwrap() > 0.0);
    assert!(arr[0]["teaser"].is_null());
}

#[tokio::test]
async fn excerpt_match_is_found() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), STORE)).unwrap();

    let (status, json) = call_json(app, "/search?q=email").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["title"], "Contact");
    assert!(arr[0]["snippet"].as_str().unwrap().contains("Email:"));
}

#[tokio::test]
async fn k_limits_results_but_not_total() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), STORE)).unwrap();

    let (status, json) = call_json(app, "/search?q=contact%20research&k=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"].as_u64().unwrap(), 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_and_missing_queries_have_no_hits() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), STORE)).unwrap();

    for uri in ["/search?q=", "/search", "/search?q=xyzzy"] {
        let (status, json) = call_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(json["total_hits"].as_u64().unwrap(), 0, "{uri}");
        assert!(json["results"].as_array().unwrap().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn doc_lookup() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), STORE)).unwrap();

    let (status, json) = call_json(app.clone(), "/doc/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Contact");
    assert_eq!(json["tags"].as_array().unwrap().len(), 0);

    let (status, json) = call_json(app, "/doc/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}

#[tokio::test]
async fn malformed_doc_id_is_json_error() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), STORE)).unwrap();

    for uri in ["/doc/abc", "/doc/99999999999", "/doc/-1"] {
        let (status, json) = call_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["error"], "invalid doc id", "{uri}");
    }
}

#[tokio::test]
async fn health_and_stats() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), STORE)).unwrap();

    let (status, body) = call(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");

    let (status, json) = call_json(app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["num_docs"].as_u64().unwrap(), 3);
    assert!(json["num_terms"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn empty_store_serves_no_hits() {
    let dir = tempdir().unwrap();
    let app = build_app(write_store(dir.path(), "var store = [];")).unwrap();

    let (status, json) = call_json(app, "/search?q=jekyll").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"].as_u64().unwrap(), 0);
}

#[test]
fn missing_store_fails_to_start() {
    let dir = tempdir().unwrap();
    let config = AppConfig {
        store: dir.path().join("missing.js"),
        analyzer: AnalyzerConfig::default(),
        scoring: ScoringConfig::default(),
    };
    let Err(err) = build_app(config) else { panic!("store should be missing") };
    assert!(format!("{err:#}").contains("loading store"));
}

#[test]
fn scoring_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scoring.json");
    fs::write(&path, r#"{"excerpt_weight": 2.5, "limit": 3}"#).unwrap();
    let scoring = load_scoring(Some(path.as_path())).unwrap();
    assert_eq!(scoring.excerpt_weight, 2.5);
    assert_eq!(scoring.limit, Some(3));
    assert_eq!(scoring.title_weight, ScoringConfig::default().title_weight);
    assert_eq!(load_scoring(None).unwrap(), ScoringConfig::default());
}

#[test]
fn invalid_scoring_is_rejected() {
    let dir = tempdir().unwrap();
    let mut config = write_store(dir.path(), STORE);
    config.scoring.title_weight = f32::NAN;
    assert!(build_app(config).is_err());
}
