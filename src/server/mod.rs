//! HTTP server: JSON API under `/api/` and the static UI on every other path.
//!
//! ```text
//! GET    /api/health
//! GET    /api/prompts?tag=&q=
//! POST   /api/prompts
//! GET    /api/prompts/{id}
//! PUT    /api/prompts/{id}
//! DELETE /api/prompts/{id}
//! GET    /api/prompts/{id}/remix
//! GET    /api/prompts/{id}/annotated
//! POST   /api/annotate
//! GET    /api/tags
//! GET    /api/categories
//! GET    /api/setup
//! POST   /api/admin/recount
//! POST   /api/admin/repair
//! GET    /api/admin/raw
//! GET    /favicon.ico              → 204
//! GET    /*path                    → static UI (SPA fallback) or built-in page
//! ```

mod api;
mod ui;

use std::path::Path;

use axum::{
    Router,
    http::StatusCode,
    routing::{any, get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;
use crate::garden::Garden;

/// Router state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub(crate) struct AppState {
    pub garden: Garden,
}

/// Bind `bind_addr` and serve until `shutdown` is cancelled.
pub async fn run(
    bind_addr: &str,
    static_dir: Option<&Path>,
    garden: Garden,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(garden, static_dir);

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "prompt garden listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("server shut down");
    Ok(())
}

pub fn build_router(garden: Garden, static_dir: Option<&Path>) -> Router {
    let state = AppState { garden };

    let router = Router::new()
        .route("/api/health",                    get(api::health))
        .route("/api/prompts",                   get(api::list_prompts).post(api::create_prompt))
        .route(
            "/api/prompts/{id}",
            get(api::get_prompt).put(api::update_prompt).delete(api::delete_prompt),
        )
        .route("/api/prompts/{id}/remix",        get(api::remix_prompt))
        .route("/api/prompts/{id}/annotated",    get(api::annotated_prompt))
        .route("/api/annotate",                  post(api::annotate))
        .route("/api/tags",                      get(api::tags))
        .route("/api/categories",                get(api::categories))
        .route("/api/setup",                     get(api::setup))
        .route("/api/admin/recount",             post(api::recount))
        .route("/api/admin/repair",              post(api::repair))
        .route("/api/admin/raw",                 get(api::raw))
        .route("/api/{*rest}",                   any(api::unknown))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }));

    let router = match ui::static_root(static_dir) {
        Some(dir) => router.fallback_service(ui::spa(&dir)),
        None => router.route("/", get(ui::root)).fallback(ui::not_found),
    };

    router.with_state(state)
}
