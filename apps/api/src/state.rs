use std::sync::Arc;

use crate::config::Config;
use crate::pages::render::PageRenderer;
use crate::store::PageStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Page table. `JsonFileStore` in production.
    pub store: Arc<dyn PageStore>,
    pub renderer: Arc<PageRenderer>,
    pub config: Config,
}
