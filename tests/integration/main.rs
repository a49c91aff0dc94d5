//! Integration tests for the DeepBlocks API service.
//!
//! The server-level tests bind an ephemeral port on 127.0.0.1 and talk to it
//! over real HTTP.

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use deepblocks_api::api::{create_router, AppState, CorsPolicy};
use deepblocks_api::config::Config;
use deepblocks_api::metadata::ServiceMetadata;

const DEV_ORIGIN: &str = "http://localhost:5173";

fn router_for(config: &Config) -> Router {
    let cors = CorsPolicy::from_config(config).expect("valid CORS config");
    create_router(AppState::new(ServiceMetadata::current()), &cors)
}

/// Serve the default router on an ephemeral port.
async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = router_for(&Config::default());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// Plain client that ignores proxy settings from the environment.
fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_root_over_http() {
    let addr = spawn_server().await;

    let response = client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "message": "DeepBlocks API is running",
            "version": "1.0.0",
            "docs": "/docs"
        })
    );
}

#[tokio::test]
async fn test_health_is_idempotent() {
    let addr = spawn_server().await;
    let client = client();

    let mut bodies = Vec::new();
    for _ in 0..5 {
        let response = client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        bodies.push(response.text().await.unwrap());
    }

    let first: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(first, json!({"status": "healthy", "version": "1.0.0"}));
    assert!(bodies.iter().all(|b| b == &bodies[0]));
}

#[tokio::test]
async fn test_root_is_idempotent() {
    let addr = spawn_server().await;
    let client = client();

    let mut bodies = Vec::new();
    for _ in 0..5 {
        let response = client
            .get(format!("http://{addr}/"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        bodies.push(response.text().await.unwrap());
    }

    assert!(bodies.iter().all(|b| b == &bodies[0]));
}

#[tokio::test]
async fn test_docs_link_resolves() {
    let addr = spawn_server().await;

    let root: Value = client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let docs = root["docs"].as_str().unwrap();

    // Follows the trailing-slash redirect, if any, to the UI page.
    let response = client()
        .get(format!("http://{addr}{docs}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_plain_options_is_not_a_preflight() {
    let addr = spawn_server().await;

    let response = client()
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    assert!(response
        .headers()
        .get("access-control-allow-credentials")
        .is_none());
}

#[tokio::test]
async fn test_unknown_path_over_http() {
    let addr = spawn_server().await;

    let response = client()
        .get(format!("http://{addr}/nonexistent"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preflight_over_http() {
    let addr = spawn_server().await;
    let client = client();

    let response = client
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/health"))
        .header("Origin", DEV_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], DEV_ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-allow-headers"], "content-type");

    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    for method in ["DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PUT"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }

    // Short-circuited: no JSON body from the handler.
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_configured_origins_are_honoured() {
    let config = Config {
        cors_allowed_origins: vec![
            DEV_ORIGIN.to_string(),
            "https://app.deepblocks.dev".to_string(),
        ],
        ..Config::default()
    };
    let app = router_for(&config);

    for (origin, allowed) in [
        (DEV_ORIGIN, true),
        ("https://app.deepblocks.dev", true),
        ("http://localhost:3000", false),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let granted = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        if allowed {
            assert_eq!(granted.unwrap(), origin);
        } else {
            assert!(granted.is_none(), "{origin} should not be granted");
        }
    }
}

#[tokio::test]
async fn test_preflight_from_foreign_origin_is_not_granted() {
    let app = router_for(&Config::default());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/")
                .header(header::ORIGIN, "http://attacker.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_openapi_document_describes_endpoints() {
    let app = router_for(&Config::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["info"]["title"], "DeepBlocks API");
    assert_eq!(doc["info"]["version"], "1.0.0");
    assert!(doc["paths"]["/"]["get"].is_object());
    assert!(doc["paths"]["/health"]["get"].is_object());
}
