//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against a stub fetcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use thumb_cache::{api::create_router, AppState, FetchCoalescingCache, FetchError};
use tower::ServiceExt;

// == Helper Functions ==

/// Builds an app whose upstream serves the path back as bytes, fails for
/// paths containing "broken", returns no bytes for paths containing "empty"
/// and never answers for paths containing "hang".
fn create_test_app() -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let cache = FetchCoalescingCache::with_fetcher(move |key: String| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if key.contains("hang") {
                futures::future::pending::<()>().await;
            }
            if key.contains("broken") {
                return Err(FetchError::TransportFailure(format!("{key} responded with 500")));
            }
            if key.contains("empty") {
                return Ok(Bytes::new());
            }
            Ok(Bytes::from(key))
        }
    });

    let state = AppState::new(cache).with_wait_timeout(Duration::from_millis(50));
    (create_router(state), calls)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(body: Body) -> Bytes {
    axum::body::to_bytes(body, usize::MAX).await.unwrap()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

// == FETCH Endpoint Tests ==

#[tokio::test]
async fn test_fetch_endpoint_success() {
    let (app, calls) = create_test_app();

    let response = app
        .oneshot(get("/fetch?url=https://img.example/a.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    let bytes = body_bytes(response.into_body()).await;
    assert_eq!(&bytes[..], b"https://img.example/a.png");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_endpoint_repeated_requests_hit_cache() {
    let (app, calls) = create_test_app();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get("/fetch?url=https://img.example/a.png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let response = app.oneshot(get("/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["fetches"], 1);
    assert_eq!(json["hits"], 2);
    assert_eq!(json["total_entries"], 1);
}

#[tokio::test]
async fn test_fetch_endpoint_empty_upstream_payload() {
    let (app, calls) = create_test_app();

    let response = app
        .oneshot(get("/fetch?url=https://x/empty.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    assert!(body_bytes(response.into_body()).await.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_endpoint_without_url() {
    let (app, calls) = create_test_app();

    let response = app.oneshot(get("/fetch")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_endpoint_invalid_url() {
    let (app, calls) = create_test_app();

    let response = app.oneshot(get("/fetch?url=not%20a%20url")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["retryable"], false);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_endpoint_upstream_failure_is_retried() {
    let (app, calls) = create_test_app();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/fetch?url=https://img.example/broken.png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["retryable"], true);
        assert!(json["error"].as_str().unwrap().contains("500"));
    }

    // Each failure was evicted, so both requests reached upstream
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_fetch_endpoint_wait_timeout() {
    let (app, calls) = create_test_app();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/fetch?url=https://img.example/hang.png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    // The second request joined the fetch the first one abandoned
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_initial_state() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 0);
    assert_eq!(json["joins"], 0);
    assert_eq!(json["fetches"], 0);
    assert_eq!(json["coalesced_rate"], 0.0);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
