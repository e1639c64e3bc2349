//! Handlers for `/api/*` routes.
//!
//! Success bodies are `{ "success": true, ... }`. Failures are
//! `{ "success": false, "message": <per-route>, "error": <detail> }` with
//! 400 for validation, 404 for unknown prompts and 500 for backend errors.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, warn};

use super::AppState;
use crate::annotation;
use crate::garden::{GardenError, ListFilter, PromptDraft, PromptPatch};

// ── Errors ────────────────────────────────────────────────────────────────────

pub(super) struct ApiError {
    message: &'static str,
    source: GardenError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.source.to_string();
        let (status, message) = match &self.source {
            GardenError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            GardenError::NotFound => (StatusCode::NOT_FOUND, detail.clone()),
            GardenError::Sheets(_) => {
                error!(route_message = self.message, error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.message.to_string())
            }
        };
        let body = json!({ "success": false, "message": message, "error": detail });
        (status, Json(body)).into_response()
    }
}

/// Attach the route's failure message to a garden error.
fn fail(message: &'static str) -> impl FnOnce(GardenError) -> ApiError {
    move |source| ApiError { message, source }
}

type ApiResult = Result<Json<Value>, ApiError>;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct AnnotateRequest {
    #[serde(default)]
    content: String,
}

// ── Prompts ───────────────────────────────────────────────────────────────────

/// GET /api/prompts?tag=&q=
pub(super) async fn list_prompts(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> ApiResult {
    let prompts = state
        .garden
        .list(&filter)
        .await
        .map_err(fail("Failed to fetch prompts"))?;
    Ok(Json(json!({ "success": true, "prompts": prompts })))
}

/// POST /api/prompts
pub(super) async fn create_prompt(
    State(state): State<AppState>,
    Json(draft): Json<PromptDraft>,
) -> ApiResult {
    let prompt = state
        .garden
        .create(draft)
        .await
        .map_err(fail("Failed to create prompt"))?;
    Ok(Json(json!({ "success": true, "prompt": prompt })))
}

/// GET /api/prompts/{id}
pub(super) async fn get_prompt(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let prompt = state
        .garden
        .get(&id)
        .await
        .map_err(fail("Failed to fetch prompt"))?;
    Ok(Json(json!({ "success": true, "prompt": prompt })))
}

/// PUT /api/prompts/{id}
pub(super) async fn update_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PromptPatch>,
) -> ApiResult {
    let prompt = state
        .garden
        .update(&id, patch)
        .await
        .map_err(fail("Failed to update prompt"))?;
    Ok(Json(json!({ "success": true, "prompt": prompt })))
}

/// DELETE /api/prompts/{id}
pub(super) async fn delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    state
        .garden
        .delete(&id)
        .await
        .map_err(fail("Failed to delete prompt"))?;
    Ok(Json(json!({ "success": true, "message": "Prompt deleted successfully" })))
}

/// GET /api/prompts/{id}/remix: a prefilled draft for the editor.
pub(super) async fn remix_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let draft = state
        .garden
        .remix(&id)
        .await
        .map_err(fail("Failed to remix prompt"))?;
    Ok(Json(json!({ "success": true, "draft": draft })))
}

/// GET /api/prompts/{id}/annotated
pub(super) async fn annotated_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let prompt = state
        .garden
        .get(&id)
        .await
        .map_err(fail("Failed to fetch prompt"))?;
    let annotation = annotation::annotate(&prompt.content);
    Ok(Json(json!({ "success": true, "annotation": annotation })))
}

/// POST /api/annotate: parse arbitrary content without storing it.
pub(super) async fn annotate(Json(req): Json<AnnotateRequest>) -> Json<Value> {
    let annotation = annotation::annotate(&req.content);
    Json(json!({ "success": true, "annotation": annotation }))
}

// ── Tags ──────────────────────────────────────────────────────────────────────

/// GET /api/tags
pub(super) async fn tags(State(state): State<AppState>) -> ApiResult {
    let tags = state
        .garden
        .tags()
        .await
        .map_err(fail("Failed to fetch tags"))?;
    Ok(Json(json!({ "success": true, "tags": tags })))
}

/// GET /api/categories
pub(super) async fn categories(State(state): State<AppState>) -> ApiResult {
    let categories = state
        .garden
        .categories()
        .await
        .map_err(fail("Failed to fetch categories"))?;
    Ok(Json(json!({ "success": true, "categories": categories })))
}

// ── Setup & admin ─────────────────────────────────────────────────────────────

/// GET /api/setup
pub(super) async fn setup(State(state): State<AppState>) -> ApiResult {
    state
        .garden
        .setup()
        .await
        .map_err(fail("Failed to initialize Google Sheets database"))?;
    Ok(Json(json!({
        "success": true,
        "message": "Google Sheets database initialized successfully",
    })))
}

/// POST /api/admin/recount
pub(super) async fn recount(State(state): State<AppState>) -> ApiResult {
    let tags = state
        .garden
        .recount()
        .await
        .map_err(fail("Failed to update tag counts"))?;
    Ok(Json(json!({ "success": true, "tags": tags })))
}

/// POST /api/admin/repair
pub(super) async fn repair(State(state): State<AppState>) -> ApiResult {
    let prompts = state
        .garden
        .repair()
        .await
        .map_err(fail("Failed to fix data"))?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Rewrote {} prompts", prompts.len()),
        "prompts": prompts,
    })))
}

/// GET /api/admin/raw
pub(super) async fn raw(State(state): State<AppState>) -> ApiResult {
    let data = state
        .garden
        .raw_rows()
        .await
        .map_err(fail("Failed to fetch debug data"))?;
    Ok(Json(json!({ "success": true, "data": data })))
}

// ── Health ────────────────────────────────────────────────────────────────────

/// GET /api/health: probes the spreadsheet.
pub(super) async fn health(State(state): State<AppState>) -> Response {
    let backend = state.garden.backend();
    match backend.spreadsheet_title().await {
        Ok(title) => Json(json!({
            "success": true,
            "status": "ok",
            "backend": backend.kind().as_str(),
            "spreadsheet": title,
        }))
        .into_response(),
        Err(e) => {
            warn!(error = %e, "health probe failed");
            ApiError {
                message: "Spreadsheet unreachable",
                source: e.into(),
            }
            .into_response()
        }
    }
}

/// Any other `/api/*` path.
pub(super) async fn unknown(uri: Uri) -> Response {
    let body = json!({
        "success": false,
        "message": "Not found",
        "error": format!("no route for {}", uri.path()),
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
