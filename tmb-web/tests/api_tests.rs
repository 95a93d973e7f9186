//! Integration tests for tmb-web API endpoints
//!
//! Tests cover:
//! - Health endpoint (answers before the model finishes loading)
//! - Loading responses while artifacts are missing
//! - Model, topic, word, document, bibliography and about views
//! - Hash-route dispatch with model-view fallback
//! - Load status

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;
use tmb_common::events::EventBus;
use tmb_web::{build_router, loader, AppState};
use tower::util::ServiceExt; // for `oneshot` method

const INFO_JSON: &str = r#"{
    "title": "Test Model",
    "meta_info": "<p>A small model for tests</p>",
    "VIS": { "overview_words": 3 }
}"#;

const META_CSV: &str = "\
10.1/a,First Paper,Jane Smith\tBob Jones,Journal A,1,2,1995-03-01,pp. 1-10
10.1/b,Second Paper,,Journal B,2,1,1987-01-01,5-9
10.1/c,Third Paper,Alice Adams,Journal A,3,4,1995-07-01,20-30
";

// topic 0: doc 0 (6), doc 2 (3); topic 1: doc 1 (4), doc 0 (2)
const DT_JSON: &str = r#"{"i":[0,2,1,0],"p":[0,2,4],"x":[6.0,3.0,4.0,2.0]}"#;

const TW_JSON: &str = r#"{
    "alpha": [0.1, 0.2],
    "tw": [
        {"words": ["novel", "plot", "hero", "villain"], "weights": [10.0, 5.0, 2.0, 1.0]},
        {"words": ["poem", "novel", "verse"], "weights": [8.0, 4.0, 1.0]}
    ]
}"#;

const DOC_LEN_JSON: &str = r#"{"doc_len":[10,8,6]}"#;

/// Test helper: Write a complete set of artifacts into `dir`
fn write_artifacts(dir: &Path) {
    std::fs::write(dir.join("info.json"), INFO_JSON).unwrap();
    std::fs::write(dir.join("meta.csv"), META_CSV).unwrap();
    std::fs::write(dir.join("dt.json"), DT_JSON).unwrap();
    std::fs::write(dir.join("tw.json"), TW_JSON).unwrap();
    std::fs::write(dir.join("doc_len.json"), DOC_LEN_JSON).unwrap();
}

/// Test helper: State with only info.json installed
async fn setup_bootstrapped(dir: &TempDir) -> AppState {
    write_artifacts(dir.path());
    loader::bootstrap(dir.path(), EventBus::new(16))
        .await
        .expect("Should bootstrap from info.json")
}

/// Test helper: State with every artifact installed
async fn setup_loaded(dir: &TempDir) -> AppState {
    let state = setup_bootstrapped(dir).await;
    loader::load_all(&state).await;
    state
}

/// Test helper: Send a GET and return status plus JSON body
async fn get_json(state: &AppState, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

// =============================================================================
// Health and loading
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_before_loading() {
    let dir = TempDir::new().unwrap();
    let state = setup_bootstrapped(&dir).await;

    let (status, body) = get_json(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "tmb-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_views_answer_loading_until_artifacts_arrive() {
    let dir = TempDir::new().unwrap();
    let state = setup_bootstrapped(&dir).await;

    let (status, body) = get_json(&state, "/api/model").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["loading"], true);
    assert_eq!(body["missing"], serde_json::json!(["topic_words"]));
    assert_eq!(body["error"]["code"], "LOADING");

    let (status, body) = get_json(&state, "/api/topic/1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["missing"].as_array().unwrap().len(), 4);

    // about only needs info.json, which bootstrap installed
    let (status, body) = get_json(&state, "/api/about").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Test Model");
}

#[tokio::test]
async fn test_status_tracks_loaded_artifacts() {
    let dir = TempDir::new().unwrap();
    let state = setup_bootstrapped(&dir).await;

    let (_, body) = get_json(&state, "/api/status").await;
    assert_eq!(body["title"], "Test Model");
    assert_eq!(body["loaded"], serde_json::json!(["info"]));
    assert_eq!(body["missing"].as_array().unwrap().len(), 4);

    loader::load_all(&state).await;

    let (_, body) = get_json(&state, "/api/status").await;
    assert_eq!(body["loaded"].as_array().unwrap().len(), 5);
    assert!(body["missing"].as_array().unwrap().is_empty());
}

// =============================================================================
// Views
// =============================================================================

#[tokio::test]
async fn test_model_view() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Test Model");

    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["topic"], 0);
    // overview_words overridden to 3 by info.json
    assert_eq!(topics[0]["label"], "1 novel plot hero");
    assert_eq!(topics[0]["link"], "#/topic/1");
    assert_eq!(topics[1]["alpha"], 0.2);
}

#[tokio::test]
async fn test_topic_view() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/topic/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topic"], 0);
    assert_eq!(body["label"], "1 novel plot hero");
    assert_eq!(body["words"].as_array().unwrap().len(), 4);
    assert_eq!(body["words"][0]["word"], "novel");
    assert_eq!(body["words"][0]["weight"], 10.0);
    assert_eq!(body["words"][0]["link"], "#/word/novel");

    let docs = body["docs"].as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["doc"], 0);
    assert_eq!(docs[0]["frac"], 0.6);
    assert_eq!(docs[0]["link"], "#/doc/0");
    assert_eq!(docs[1]["doc"], 2);
    assert_eq!(docs[1]["frac"], 0.5);
    assert!(docs[0]["citation"]
        .as_str()
        .unwrap()
        .contains("<em>Journal A</em>"));

    assert_eq!(body["plot"]["kind"], "image");
    assert_eq!(body["plot"]["src"], "topic_plot/001.png");
}

#[tokio::test]
async fn test_topic_out_of_range_is_not_found() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/topic/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = get_json(&state, "/api/topic/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_path_parameters_are_bad_requests() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    for uri in ["/api/doc/abc", "/api/doc/-1", "/api/topic/x", "/api/topic/x/yearly"] {
        let (status, body) = get_json(&state, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{}", uri);
        assert!(body["error"]["message"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_topic_yearly_series() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/topic/1/yearly").await;
    assert_eq!(status, StatusCode::OK);
    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["year"], 1987);
    assert_eq!(series[0]["value"], 0.0);
    assert_eq!(series[1]["year"], 1995);
    // (6 + 3) / (10 + 6)
    assert_eq!(series[1]["value"], 0.5625);
}

#[tokio::test]
async fn test_word_view() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/word/novel").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["word"], "novel");
    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["topic"], 0);
    assert_eq!(topics[0]["rank"], 1);
    assert_eq!(topics[1]["topic"], 1);
    assert_eq!(topics[1]["rank"], 2);
    assert_eq!(topics[1]["link"], "#/topic/2");

    let (status, body) = get_json(&state, "/api/word/absent").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["topics"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_doc_view() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/doc/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["doi"], "10.1/a");
    assert_eq!(body["uri"], "http://dx.doi.org/10.1/a");
    assert_eq!(body["doc_len"], 10);
    assert_eq!(
        body["citation"],
        "Smith, Jane, and Bob Jones. \"First Paper.\" <em>Journal A</em> 1, no. 2 (March 1995): 1\u{2013}10."
    );

    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["topic"], 0);
    assert_eq!(topics[0]["weight"], 6.0);
    assert_eq!(topics[1]["topic"], 1);
    assert_eq!(topics[1]["frac"], 0.2);

    let (status, _) = get_json(&state, "/api/doc/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bib_view_uses_configured_sort() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/bib").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["major"], "year");
    assert_eq!(body["minor"], "alpha");

    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["heading"], "1987");
    assert_eq!(sections[1]["heading"], "1995");
    // Adams before Smith within 1995
    assert_eq!(sections[1]["docs"][0]["doc"], 2);
    assert_eq!(sections[1]["docs"][1]["doc"], 0);
    assert_eq!(sections[0]["docs"][0]["link"], "#/doc/1");
}

#[tokio::test]
async fn test_bib_view_query_overrides() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (_, body) = get_json(&state, "/api/bib?major=decade").await;
    let headings: Vec<&str> = body["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["heading"].as_str().unwrap())
        .collect();
    assert_eq!(headings, vec!["1980s", "1990s"]);

    let (_, body) = get_json(&state, "/api/bib?major=alpha&minor=date").await;
    let headings: Vec<&str> = body["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["heading"].as_str().unwrap())
        .collect();
    assert_eq!(headings, vec!["A", "S", "[Anon]"]);
    assert!(body["sections"][2]["docs"][0]["citation"]
        .as_str()
        .unwrap()
        .starts_with("[Anon]. "));
}

#[tokio::test]
async fn test_about_view() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/about").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta_info"], "<p>A small model for tests</p>");
}

// =============================================================================
// Route dispatch
// =============================================================================

#[tokio::test]
async fn test_route_dispatch() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/route?hash=%23%2Fdoc%2F2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "doc");
    assert_eq!(body["data"]["doc"], 2);

    let (_, body) = get_json(&state, "/api/route?hash=%23%2Ftopic%2F2").await;
    assert_eq!(body["view"], "topic");
    assert_eq!(body["data"]["topic"], 1);

    let (_, body) = get_json(&state, "/api/route?hash=%23%2Fbib").await;
    assert_eq!(body["view"], "bib");
}

#[tokio::test]
async fn test_route_dispatch_falls_back_to_model() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/route?hash=%23%2Fnonsense").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "model");
    assert_eq!(body["data"]["topics"].as_array().unwrap().len(), 2);

    let (_, body) = get_json(&state, "/api/route").await;
    assert_eq!(body["view"], "model");
}

#[tokio::test]
async fn test_config_reports_effective_vis() {
    let dir = TempDir::new().unwrap();
    let state = setup_loaded(&dir).await;

    let (status, body) = get_json(&state, "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overview_words"], 3);
    assert_eq!(body["topic_view_words"], 50);
    assert_eq!(body["bib_sort"]["major"], "year");
}
