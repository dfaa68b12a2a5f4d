use std::sync::Arc;

use crate::ai_client::RecommendationBackend;
use crate::catalog::CatalogSource;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Catalog snapshot source. HTTP course service or static file, chosen via config.
    pub catalog: Arc<dyn CatalogSource>,
    /// AI recommendation backend. `AiClient` in production, fakes in tests.
    pub backend: Arc<dyn RecommendationBackend>,
    pub config: Config,
}
