//! Axum route handlers for page creation, viewing and stats.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::errors::AppError;
use crate::models::page::{CreatePageRequest, CreatePageResponse, PageSummary};
use crate::pages::validation::validate_create_request;
use crate::state::AppState;

/// POST /api/create-page
///
/// Validates the payload, stores a new page and returns its URL path.
pub async fn handle_create_page(
    State(state): State<AppState>,
    payload: Result<Json<CreatePageRequest>, JsonRejection>,
) -> Result<Json<CreatePageResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let new_page = validate_create_request(request, state.config.default_contact.as_ref())
        .map_err(|problems| AppError::Validation(problems.join("; ")))?;

    let record = state
        .store
        .create(new_page)
        .await
        .map_err(|e| AppError::storage("Failed to create page", e))?;

    Ok(Json(CreatePageResponse {
        success: true,
        page_url: record.url_path(),
    }))
}

/// GET /api/stats
///
/// Redacted summary of every stored page, in creation order.
pub async fn handle_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<PageSummary>>, AppError> {
    let records = state
        .store
        .list()
        .await
        .map_err(|e| AppError::storage("Failed to get stats", e))?;

    Ok(Json(records.iter().map(|r| r.summary()).collect()))
}

/// Errors of the HTML view route, answered in plain text.
#[derive(Debug)]
pub enum ViewError {
    NotFound,
    Server,
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        match self {
            ViewError::NotFound => (StatusCode::NOT_FOUND, "Page not found").into_response(),
            ViewError::Server => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

/// GET /view/:id
///
/// Counts the view, then renders the page with the updated record inlined.
pub async fn handle_view_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ViewError> {
    let record = state
        .store
        .record_view(&id)
        .await
        .map_err(|e| {
            error!("Error serving page {id}: {e}");
            ViewError::Server
        })?
        .ok_or(ViewError::NotFound)?;

    let html = state.renderer.render_view(&record).map_err(|e| {
        error!("Error rendering page {id}: {e:?}");
        ViewError::Server
    })?;

    Ok(Html(html))
}
