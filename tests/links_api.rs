use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value as JsonValue, json};
use tower::ServiceExt;

use link_registry::application::ports::link_document_store::{
    DocumentData, FieldPath, FieldValue, LinkDocumentStore,
};
use link_registry::bootstrap::app_context::{AppContext, AppServices};
use link_registry::bootstrap::config::Config;
use link_registry::infrastructure::memory::link_store::InMemoryLinkStore;
use link_registry::presentation::http::router;

fn test_config() -> Config {
    Config::from_vars(|k| match k {
        "STORE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .unwrap()
}

fn app_with(store: Arc<dyn LinkDocumentStore>) -> Router {
    router(AppContext::new(test_config(), AppServices::new(store)))
}

fn app() -> Router {
    app_with(Arc::new(InMemoryLinkStore::new("userdata", "userlinks")))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn link_body(platform: &str, link: &str) -> JsonValue {
    json!({ "platform": platform, "link": link })
}

#[tokio::test]
async fn list_is_not_found_until_first_add() {
    let app = app();
    assert_eq!(
        send(&app, get("/links")).await,
        (StatusCode::NOT_FOUND, "No data found".to_string())
    );

    let req = post_json("/links", link_body("GitHub", "https://github.com/me"));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Link added/updated successfully");

    let (status, body) = send(&app, get("/links")).await;
    assert_eq!(status, StatusCode::OK);
    let doc: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(
        doc,
        json!({ "social_media_links": { "github": "https://github.com/me" } })
    );
}

#[tokio::test]
async fn platform_names_are_lowercased() {
    let app = app();
    send(&app, post_json("/links", link_body("Twitter", "x"))).await;

    for uri in ["/links/twitter", "/links/TWITTER", "/links/TwItTeR"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        let got: JsonValue = serde_json::from_str(&body).unwrap();
        assert_eq!(got, json!({ "platform": "twitter", "link": "x" }));
    }
}

#[tokio::test]
async fn repeated_add_is_idempotent() {
    let app = app();
    for _ in 0..3 {
        let (status, _) = send(&app, post_json("/links", link_body("github", "g"))).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = send(&app, get("/links")).await;
    let doc: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(doc, json!({ "social_media_links": { "github": "g" } }));
}

#[tokio::test]
async fn add_merges_into_existing_document() {
    let app = app();
    send(&app, post_json("/links", link_body("github", "g"))).await;
    send(&app, post_json("/links", link_body("LinkedIn", "l"))).await;
    send(&app, post_json("/links", link_body("github", "g2"))).await;

    let (_, body) = send(&app, get("/links")).await;
    let doc: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(
        doc,
        json!({ "social_media_links": { "github": "g2", "linkedin": "l" } })
    );
}

#[tokio::test]
async fn unknown_platform_message_uses_lowercase() {
    let app = app();
    assert_eq!(
        send(&app, get("/links/Mastodon")).await,
        (StatusCode::NOT_FOUND, "No data found".to_string())
    );

    send(&app, post_json("/links", link_body("github", "g"))).await;
    assert_eq!(
        send(&app, get("/links/Mastodon")).await,
        (
            StatusCode::NOT_FOUND,
            "Link for platform mastodon not found".to_string()
        )
    );
}

#[tokio::test]
async fn empty_link_reads_as_missing() {
    let app = app();
    send(&app, post_json("/links", link_body("github", ""))).await;
    assert_eq!(
        send(&app, get("/links/github")).await,
        (
            StatusCode::NOT_FOUND,
            "Link for platform github not found".to_string()
        )
    );
    assert_eq!(
        send(&app, delete("/delete-link/github")).await,
        (
            StatusCode::NOT_FOUND,
            "Link for platform github not found".to_string()
        )
    );
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app();
    send(&app, post_json("/links", link_body("github", "g"))).await;
    send(&app, post_json("/links", link_body("twitter", "t"))).await;

    assert_eq!(
        send(&app, delete("/delete-link/GitHub")).await,
        (StatusCode::OK, "Link deleted successfully".to_string())
    );
    let (status, _) = send(&app, get("/links/github")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Only the field goes away; the document and its other links remain.
    let (status, body) = send(&app, get("/links")).await;
    assert_eq!(status, StatusCode::OK);
    let doc: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(doc, json!({ "social_media_links": { "twitter": "t" } }));
}

#[tokio::test]
async fn delete_reports_missing_document_and_platform() {
    let app = app();
    assert_eq!(
        send(&app, delete("/delete-link/github")).await,
        (StatusCode::NOT_FOUND, "No data found".to_string())
    );
    send(&app, post_json("/links", link_body("twitter", "t"))).await;
    assert_eq!(
        send(&app, delete("/delete-link/GitHub")).await,
        (
            StatusCode::NOT_FOUND,
            "Link for platform github not found".to_string()
        )
    );
}

#[tokio::test]
async fn update_link_changes_existing_document() {
    let app = app();
    send(&app, post_json("/links", link_body("github", "g"))).await;
    assert_eq!(
        send(&app, post_json("/update-link", link_body("GITHUB", "g2"))).await,
        (StatusCode::OK, "Link updated successfully".to_string())
    );
    let (_, body) = send(&app, get("/links/github")).await;
    let got: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(got, json!({ "platform": "github", "link": "g2" }));
}

#[tokio::test]
async fn update_link_without_document_is_store_error() {
    let app = app();
    assert_eq!(
        send(&app, post_json("/update-link", link_body("github", "g"))).await,
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "NOT_FOUND: No document to update: userdata/userlinks".to_string()
        )
    );
    let (status, _) = send(&app, get("/links")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_never_reaches_store() {
    let store = Arc::new(CountingStore::default());
    let app = app_with(store.clone());
    let (status, _) = send(&app, post_json("/links", json!({ "platform": "github" }))).await;
    assert!(status.is_client_error());
    assert_eq!(store.calls(), 0);
}

struct FailingStore;

#[async_trait]
impl LinkDocumentStore for FailingStore {
    async fn get(&self) -> anyhow::Result<Option<DocumentData>> {
        anyhow::bail!("PERMISSION_DENIED: Missing or insufficient permissions.")
    }

    async fn set(&self, _data: &DocumentData) -> anyhow::Result<()> {
        anyhow::bail!("PERMISSION_DENIED: Missing or insufficient permissions.")
    }

    async fn update(&self, _fields: &[(FieldPath, FieldValue)]) -> anyhow::Result<()> {
        anyhow::bail!("PERMISSION_DENIED: Missing or insufficient permissions.")
    }
}

#[tokio::test]
async fn store_failures_are_500_with_message() {
    let app = app_with(Arc::new(FailingStore));
    let expected = (
        StatusCode::INTERNAL_SERVER_ERROR,
        "PERMISSION_DENIED: Missing or insufficient permissions.".to_string(),
    );
    assert_eq!(send(&app, get("/links")).await, expected);
    assert_eq!(send(&app, get("/links/github")).await, expected);
    assert_eq!(
        send(&app, post_json("/links", link_body("github", "g"))).await,
        expected
    );
    assert_eq!(
        send(&app, post_json("/update-link", link_body("github", "g"))).await,
        expected
    );
    assert_eq!(send(&app, delete("/delete-link/github")).await, expected);
}

#[tokio::test]
async fn health_reflects_store_reachability() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<JsonValue>(&body).unwrap(), json!({ "status": "ok" }));

    let (_, body) = send(&app_with(Arc::new(FailingStore)), get("/health")).await;
    assert_eq!(
        serde_json::from_str::<JsonValue>(&body).unwrap(),
        json!({ "status": "degraded" })
    );
}

#[derive(Default)]
struct CountingStore {
    inner_calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.inner_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkDocumentStore for CountingStore {
    async fn get(&self) -> anyhow::Result<Option<DocumentData>> {
        self.inner_calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn set(&self, _data: &DocumentData) -> anyhow::Result<()> {
        self.inner_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, _fields: &[(FieldPath, FieldValue)]) -> anyhow::Result<()> {
        self.inner_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn disallowed_origin_is_rejected_before_store() {
    let store = Arc::new(CountingStore::default());
    let app = app_with(store.clone());

    let req = Request::get("/links")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        send(&app, req).await,
        (StatusCode::FORBIDDEN, "Not allowed by CORS".to_string())
    );

    let req = Request::post("/links")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(link_body("github", "g").to_string()))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers() {
    let app = app();
    let req = Request::get("/links")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn preflight_from_allowed_origin_lists_methods() {
    let app = app();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/delete-link/github")
        .header(header::ORIGIN, "https://bizcard-socials-abyadav.netlify.app")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let methods = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("DELETE"), "{methods}");
}

#[tokio::test]
async fn requests_without_origin_are_allowed() {
    let store = Arc::new(CountingStore::default());
    let app = app_with(store.clone());
    let (status, _) = send(&app, get("/links")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.calls(), 1);
}
