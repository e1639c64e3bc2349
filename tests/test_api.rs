//! HTTP API tests against the in-memory sheets backend.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use prompt_garden::config::SheetNames;
use prompt_garden::garden::Garden;
use prompt_garden::server::build_router;
use prompt_garden::sheets::SheetsBackend;
use prompt_garden::sheets::memory::MemorySheets;

async fn app() -> Router {
    let garden = Garden::new(SheetsBackend::Memory(MemorySheets::new()), SheetNames::default());
    garden.setup().await.unwrap();
    build_router(garden, None)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, json) = call(app, Method::POST, "/api/prompts", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json["prompt"].clone()
}

#[tokio::test]
async fn test_create_and_fetch_roundtrip() {
    let app = app().await;
    let created = create(
        &app,
        json!({ "title": "Haiku", "content": "Write about [SEASON]", "tags": ["a", "b"] }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, json) = call(&app, Method::GET, &format!("/api/prompts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["prompt"]["tags"], json!(["a", "b"]));
    assert_eq!(json["prompt"]["title"], "Haiku");
    assert!(json["prompt"]["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_create_without_content_is_400() {
    let app = app().await;
    let (status, json) =
        call(&app, Method::POST, "/api/prompts", Some(json!({ "title": "empty" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_with_non_list_tags_stores_none() {
    let app = app().await;
    let created = create(&app, json!({ "content": "c", "tags": "oops" })).await;
    assert_eq!(created["tags"], json!([]));
}

#[tokio::test]
async fn test_unknown_prompt_is_404() {
    let app = app().await;
    let (status, json) = call(&app, Method::GET, "/api/prompts/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Prompt not found");

    let (status, _) = call(&app, Method::DELETE, "/api/prompts/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = app().await;
    let created = create(&app, json!({ "title": "T", "content": "c", "category": "Work" })).await;
    let id = created["id"].as_str().unwrap();

    let (status, json) = call(
        &app,
        Method::PUT,
        &format!("/api/prompts/{id}"),
        Some(json!({ "content": "new body" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prompt"]["content"], "new body");
    assert_eq!(json["prompt"]["category"], "Work");

    let (status, json) = call(&app, Method::DELETE, &format!("/api/prompts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Prompt deleted successfully");

    let (_, json) = call(&app, Method::GET, "/api/prompts", None).await;
    assert_eq!(json["prompts"], json!([]));
}

#[tokio::test]
async fn test_list_filters() {
    let app = app().await;
    create(&app, json!({ "title": "Rust", "content": "review code", "tags": ["dev"] })).await;
    create(&app, json!({ "title": "Poem", "content": "verse", "category": "Fun" })).await;

    let (_, json) = call(&app, Method::GET, "/api/prompts?tag=fun", None).await;
    assert_eq!(json["prompts"].as_array().unwrap().len(), 1);
    assert_eq!(json["prompts"][0]["title"], "Poem");

    let (_, json) = call(&app, Method::GET, "/api/prompts?q=REVIEW", None).await;
    assert_eq!(json["prompts"][0]["title"], "Rust");

    let (_, json) = call(&app, Method::GET, "/api/prompts?tag=dev&q=verse", None).await;
    assert_eq!(json["prompts"], json!([]));
}

#[tokio::test]
async fn test_tags_and_categories_recomputed() {
    let app = app().await;
    create(&app, json!({ "content": "a", "tags": ["x"], "category": "Work" })).await;
    create(&app, json!({ "content": "b", "tags": ["x"] })).await;

    let (_, json) = call(&app, Method::GET, "/api/tags", None).await;
    assert_eq!(json["tags"][0], json!({ "name": "x", "count": 2, "isCategory": false }));
    assert_eq!(json["tags"][1], json!({ "name": "Work", "count": 1, "isCategory": true }));

    let (_, json) = call(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(json["categories"], json!(["Work"]));
}

#[tokio::test]
async fn test_remix_and_annotated() {
    let app = app().await;
    let created = create(
        &app,
        json!({ "title": "Base", "content": "Hi [name]\n> tip\n1. follow", "tags": ["t"] }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (_, json) = call(&app, Method::GET, &format!("/api/prompts/{id}/remix"), None).await;
    assert_eq!(json["draft"]["title"], "Base (Remix)");
    assert_eq!(json["draft"]["tags"], json!(["t"]));

    let (_, json) = call(&app, Method::GET, &format!("/api/prompts/{id}/annotated"), None).await;
    let a = &json["annotation"];
    assert_eq!(a["clean"], "Hi [name]");
    assert_eq!(a["variables"], json!(["NAME"]));
    let types: Vec<_> = a["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["text", "note", "followup"]);
}

#[tokio::test]
async fn test_annotate_endpoint() {
    let app = app().await;
    let (status, json) = call(
        &app,
        Method::POST,
        "/api/annotate",
        Some(json!({ "content": "plain text" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["annotation"]["segments"][0]["content"], "plain text");
    assert_eq!(json["annotation"]["segments"][0]["parts"][0]["kind"], "text");
}

#[tokio::test]
async fn test_setup_and_admin_routes() {
    let app = app().await;
    let (status, json) = call(&app, Method::GET, "/api/setup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let a = create(&app, json!({ "content": "a" })).await;
    create(&app, json!({ "content": "b" })).await;
    let id = a["id"].as_str().unwrap();
    call(&app, Method::DELETE, &format!("/api/prompts/{id}"), None).await;

    let (_, json) = call(&app, Method::GET, "/api/admin/raw", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let (status, json) = call(&app, Method::POST, "/api/admin/repair", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prompts"].as_array().unwrap().len(), 1);

    let (_, json) = call(&app, Method::GET, "/api/admin/raw", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let (status, json) = call(&app, Method::POST, "/api/admin/recount", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tags"], json!([]));
}

#[tokio::test]
async fn test_health_reports_backend() {
    let app = app().await;
    let (status, json) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["backend"], "memory");
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_backend_errors_are_500() {
    // No setup: the Prompts sheet does not exist yet.
    let garden = Garden::new(SheetsBackend::Memory(MemorySheets::new()), SheetNames::default());
    let app = build_router(garden, None);
    let (status, json) = call(&app, Method::GET, "/api/prompts", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to fetch prompts");
    assert!(json["error"].as_str().unwrap().contains("Unable to parse range"));
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = app().await;
    let (status, json) = call(&app, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_root_page_without_ui_build() {
    let app = app().await;
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Prompt Garden"));

    let (status, _) = call(&app, Method::GET, "/prompt/123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_spa_fallback_serves_index() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>garden-spa</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

    let garden = Garden::new(SheetsBackend::Memory(MemorySheets::new()), SheetNames::default());
    let app = build_router(garden, Some(dir.path()));

    for (uri, expected) in [
        ("/", "garden-spa"),
        ("/prompt/abc", "garden-spa"),
        ("/app.js", "console.log(1)"),
    ] {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains(expected), "{uri}");
    }
}
