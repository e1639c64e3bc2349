//! Static UI hosting.
//!
//! With a built frontend on disk, every non-API path is served from it and
//! unknown paths fall back to `index.html` for client-side routing. Without
//! one, `/` shows a small built-in page and everything else is a 404.

use std::path::{Path, PathBuf};

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

const ROOT_INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Prompt Garden</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #f6f8f4; color: #1d2b1f;
      display: flex; align-items: center; justify-content: center;
      height: 100vh;
    }
    .card {
      text-align: center; padding: 2rem 3rem;
      border: 1px solid #cfdccb; border-radius: 12px;
      background: #ffffff;
    }
    h1 { font-size: 1.5rem; margin-bottom: 0.5rem; }
    p  { font-size: 0.9rem; color: #5b6b5d; margin-bottom: 0.25rem; }
    code { font-size: 0.85rem; }
  </style>
</head>
<body>
  <div class="card">
    <h1>Prompt Garden</h1>
    <p>The API is running at <code>/api/prompts</code>.</p>
    <p>Set <code>ui.static_dir</code> to serve the web interface.</p>
  </div>
</body>
</html>
"#;

/// Directory to serve from, if configured and present on disk.
pub(super) fn static_root(dir: Option<&Path>) -> Option<PathBuf> {
    match dir {
        Some(d) if d.is_dir() => {
            info!(dir = %d.display(), "serving UI from disk");
            Some(d.to_path_buf())
        }
        Some(d) => {
            info!(dir = %d.display(), "UI directory missing, using built-in page");
            None
        }
        None => None,
    }
}

/// File service with SPA fallback to `index.html`.
pub(super) fn spa(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

/// GET / when no UI build is configured.
pub(super) async fn root() -> Html<&'static str> {
    Html(ROOT_INDEX_HTML)
}

pub(super) async fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}
