use std::io::ErrorKind;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::errors::AppError;
use crate::state::AppState;

/// Prefixes owned by the server; unmatched paths under them are 404s rather
/// than client-side routes.
const SERVER_PREFIXES: &[&str] = &["/api", "/view"];

/// Fallback for every unrouted request: serves the SPA entry document.
pub async fn spa_fallback(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    if SERVER_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return AppError::NotFound(format!("No route for {path}")).into_response();
    }
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let index = state.config.static_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
        Err(e) => {
            error!("Could not read {}: {e}", index.display());
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
