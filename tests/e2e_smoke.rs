// tests/e2e_smoke.rs

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot` (tower 0.5 with features=["util"])

use review_sentiment_api::config::ServiceConfig;
use review_sentiment_api::sentiment::LexiconClassifier;
use review_sentiment_api::{router, AppState, ReviewStore};

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn smoke_two_reviews_time_series_and_countries() {
    // Build a plain Axum Router without Shuttle runtime
    let app: Router = router(AppState::new(
        Arc::new(ReviewStore::new()),
        Arc::new(LexiconClassifier::default()),
        ServiceConfig::default(),
    ));

    let body = json!({
        "asin": "B0TESTXX01",
        "title": "Test product",
        "results": [
            { "sentiment": "POSITIVE", "confidence": 0.8, "text": "good",
              "date": "5 August 2025", "country": "US" },
            { "sentiment": "NEGATIVE", "confidence": 0.6, "text": "bad",
              "date": "August 6, 2025", "country": "US" }
        ]
    });
    let req = Request::builder()
        .method("POST")
        .uri("/ingest_results")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, ts) = get_json(&app, "/timeseries/B0TESTXX01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ts["labels"], json!(["2025-08-05", "2025-08-06"]));
    assert_eq!(ts["positive"], json!([1, 0]));
    assert_eq!(ts["negative"], json!([0, 1]));
    assert_eq!(ts["neutral"], json!([0, 0]));

    let (status, cs) = get_json(&app, "/country_sentiment/B0TESTXX01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cs["countries"], json!(["US"]));
    assert_eq!(cs["positive"], json!([1]));
    assert_eq!(cs["negative"], json!([1]));
    assert_eq!(cs["neutral"], json!([0]));
}
