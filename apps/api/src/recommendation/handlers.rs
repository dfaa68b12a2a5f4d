//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Preferences;
use crate::recommendation::service::{
    recommend, recommend_by_preferences, resolve_answer, RecommendationBatch,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub answer: String,
}

/// POST /api/v1/recommendations
///
/// AI-backed recommendations, falling back to the preference filter when the AI
/// backend is down (unless disabled in config).
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<RecommendationBatch>, AppError> {
    let batch = recommend(
        state.catalog.as_ref(),
        state.backend.as_ref(),
        &prefs,
        state.config.ai_fallback_enabled,
    )
    .await?;
    Ok(Json(batch))
}

/// POST /api/v1/recommendations/preferences
pub async fn handle_recommend_by_preferences(
    State(state): State<AppState>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<RecommendationBatch>, AppError> {
    let batch = recommend_by_preferences(state.catalog.as_ref(), &prefs).await?;
    Ok(Json(batch))
}

/// POST /api/v1/recommendations/resolve
///
/// Resolves an AI answer the caller already obtained from the backend.
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<RecommendationBatch>, AppError> {
    let batch = resolve_answer(state.catalog.as_ref(), &request.answer).await?;
    Ok(Json(batch))
}
