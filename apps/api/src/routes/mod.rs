pub mod health;
pub mod spa;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::pages::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/create-page", post(handlers::handle_create_page))
        .route("/api/stats", get(handlers::handle_stats))
        .route("/view/:id", get(handlers::handle_view_page))
        .nest_service("/static", static_files)
        .fallback(spa::spa_fallback)
        .with_state(state)
}
