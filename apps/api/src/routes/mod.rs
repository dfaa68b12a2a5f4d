pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/recommendations", post(handlers::handle_recommend))
        .route(
            "/api/v1/recommendations/preferences",
            post(handlers::handle_recommend_by_preferences),
        )
        .route("/api/v1/recommendations/resolve", post(handlers::handle_resolve))
        .with_state(state)
}
