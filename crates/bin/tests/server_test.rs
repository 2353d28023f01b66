//! Integration tests for the web form

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use earnviz_bin::{AppState, app_router};
use earnviz_data::{FixtureProvider, Provider};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

fn router() -> Router {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/statements.json");
    let provider = FixtureProvider::from_path(path).unwrap();
    app_router(Arc::new(AppState::new(Provider::from(provider))))
}

fn submit(ticker: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("ticker={ticker}")))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_shows_form() {
    let response = router()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<form method="post" action="/">"#));
    assert!(html.contains(r#"name="ticker""#));
    assert!(!html.contains("<img"));
}

#[tokio::test]
async fn test_healthz() {
    let response = router()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_known_ticker_embeds_svg() {
    let response = router().oneshot(submit("+nvda+")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<img src="data:image/svg+xml;base64,"#));
    assert!(html.contains("NVDA Earnings Q3 2023"));
    assert!(html.contains(r#"value="NVDA""#));
}

#[tokio::test]
async fn test_unknown_ticker_reshows_form() {
    let response = router().oneshot(submit("ZZZZ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains(r#"class="error""#));
    assert!(html.contains("ZZZZ"));
    assert!(html.contains(r#"name="ticker""#));
    assert!(!html.contains("<img"));
}

#[tokio::test]
async fn test_missing_field_is_not_found() {
    let response = router().oneshot(submit("ACME")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("ACME did not report Pretax Income"));
}

#[tokio::test]
async fn test_blank_ticker_is_bad_request() {
    let response = router().oneshot(submit("+")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains(r#"name="ticker""#));
}
