//! Recommendation orchestration. Wires the AI backend, the catalog and the pure
//! extraction/resolution/filter functions together.
//!
//! The catalog is fetched at most once per batch and only borrowed by the core.

use serde::Serialize;
use tracing::{info, warn};

use crate::ai_client::{AiRecommendationRequest, RecommendationBackend};
use crate::catalog::CatalogSource;
use crate::errors::AppError;
use crate::models::{Preferences, ResolvedRecommendation};
use crate::recommendation::extractor::{extract_candidates, ExtractionError};
use crate::recommendation::preference_filter::filter_by_preferences;
use crate::recommendation::resolver::resolve_candidates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Ai,
    PreferenceFilter,
}

/// One batch of recommendations plus where it came from.
///
/// An empty batch with `extraction_error` set means the AI answer could not be read;
/// an empty batch without it means nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationBatch {
    pub source: RecommendationSource,
    pub recommendations: Vec<ResolvedRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<ExtractionError>,
}

impl RecommendationBatch {
    fn from_ai(recommendations: Vec<ResolvedRecommendation>) -> Self {
        Self {
            source: RecommendationSource::Ai,
            recommendations,
            extraction_error: None,
        }
    }

    fn unreadable_answer(error: ExtractionError) -> Self {
        Self {
            source: RecommendationSource::Ai,
            recommendations: Vec::new(),
            extraction_error: Some(error),
        }
    }
}

/// Asks the AI backend and resolves its answer; falls back to the preference filter
/// when the backend fails and `fallback_enabled` is set.
pub async fn recommend(
    catalog: &dyn CatalogSource,
    backend: &dyn RecommendationBackend,
    prefs: &Preferences,
    fallback_enabled: bool,
) -> Result<RecommendationBatch, AppError> {
    prefs.validate()?;

    let request = AiRecommendationRequest::from(prefs);
    match backend.recommend(&request).await {
        Ok(answer) => resolve_answer(catalog, &answer.answer).await,
        Err(e) if fallback_enabled => {
            warn!(error = %e, "AI backend failed, falling back to preference filter");
            recommend_by_preferences(catalog, prefs).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves an AI answer that the caller already holds.
pub async fn resolve_answer(
    catalog: &dyn CatalogSource,
    answer: &str,
) -> Result<RecommendationBatch, AppError> {
    let candidates = match extract_candidates(answer) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(error = %e, "Could not extract recommendations from AI answer");
            return Ok(RecommendationBatch::unreadable_answer(e));
        }
    };

    if candidates.is_empty() {
        info!("AI answer contained no usable recommendations");
        return Ok(RecommendationBatch::from_ai(Vec::new()));
    }

    let courses = catalog.list_all_courses().await?;
    let recommendations = resolve_candidates(&candidates, &courses);

    let unresolved = recommendations
        .iter()
        .filter(|r| r.course.is_placeholder())
        .count();
    info!(
        candidates = candidates.len(),
        unresolved,
        catalog_size = courses.len(),
        catalog = catalog.name(),
        "Resolved AI recommendations"
    );

    Ok(RecommendationBatch::from_ai(recommendations))
}

/// Rule-based recommendations only; never touches the AI backend.
pub async fn recommend_by_preferences(
    catalog: &dyn CatalogSource,
    prefs: &Preferences,
) -> Result<RecommendationBatch, AppError> {
    prefs.validate()?;

    let courses = catalog.list_all_courses().await?;
    let recommendations = filter_by_preferences(&courses, prefs);
    info!(
        matched = recommendations.len(),
        catalog_size = courses.len(),
        "Filtered catalog by preferences"
    );

    Ok(RecommendationBatch {
        source: RecommendationSource::PreferenceFilter,
        recommendations,
        extraction_error: None,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::ai_client::AiClient;
    use crate::recommendation::testing::{
        sample_catalog, CountingCatalog, FailingBackend, FailingCatalog, FixedBackend,
    };

    fn prefs(interests: &[&str]) -> Preferences {
        Preferences {
            interests: interests.iter().map(|s| s.to_string()).collect(),
            credit_preference: None,
            additional_info: Some("I enjoy databases".to_string()),
        }
    }

    const ANSWER: &str = r#"Based on your interests I recommend:
[
  {"course": "query optimization", "reason": "Directly covers query planning."},
  {"course": "Advanced NLP and Natural Language Processing", "reason": "Modern AI."},
  {"course": "Underwater Basket Weaving", "reason": "Relaxing."}
]
Good luck with your studies!"#;

    #[tokio::test]
    async fn test_ai_answer_is_resolved_in_order() {
        let catalog = CountingCatalog::new(sample_catalog());
        let backend = FixedBackend(ANSWER.to_string());

        let batch = recommend(&catalog, &backend, &prefs(&["Databases"]), true)
            .await
            .unwrap();

        assert_eq!(batch.source, RecommendationSource::Ai);
        assert!(batch.extraction_error.is_none());
        let ids: Vec<&str> = batch
            .recommendations
            .iter()
            .map(|r| r.course.id.as_str())
            .collect();
        assert_eq!(ids, vec!["course2", "course1", "unknown"]);
        assert_eq!(batch.recommendations[0].reason, "Directly covers query planning.");
        assert_eq!(batch.recommendations[2].course.title, "Underwater Basket Weaving");
        assert_eq!(catalog.calls(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_answer_yields_empty_batch_with_error() {
        let catalog = CountingCatalog::new(sample_catalog());
        let backend = FixedBackend("Sorry, I cannot help with that.".to_string());

        let batch = recommend(&catalog, &backend, &prefs(&["Databases"]), true)
            .await
            .unwrap();

        assert!(batch.recommendations.is_empty());
        assert_eq!(batch.extraction_error, Some(ExtractionError::NoArrayFound));
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_backend_answer_is_an_extraction_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/recommendation");
                then.status(200).json_body(json!({"answer": "   "}));
            })
            .await;
        let backend = AiClient::new(server.base_url(), Duration::from_secs(5)).unwrap();

        for fallback_enabled in [true, false] {
            let catalog = CountingCatalog::new(sample_catalog());

            let batch = recommend(&catalog, &backend, &prefs(&["Databases"]), fallback_enabled)
                .await
                .unwrap();

            assert_eq!(batch.source, RecommendationSource::Ai);
            assert!(batch.recommendations.is_empty());
            assert_eq!(batch.extraction_error, Some(ExtractionError::NoArrayFound));
            assert_eq!(catalog.calls(), 0);

            let body = serde_json::to_value(&batch).unwrap();
            assert_eq!(body["extractionError"]["kind"], "no_array_found");
        }
    }

    #[tokio::test]
    async fn test_empty_candidate_list_skips_catalog() {
        let catalog = CountingCatalog::new(sample_catalog());

        let batch = resolve_answer(&catalog, "Nothing suitable: []").await.unwrap();

        assert!(batch.recommendations.is_empty());
        assert!(batch.extraction_error.is_none());
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_preference_filter() {
        let catalog = CountingCatalog::new(sample_catalog());

        let batch = recommend(&catalog, &FailingBackend, &prefs(&["databases"]), true)
            .await
            .unwrap();

        assert_eq!(batch.source, RecommendationSource::PreferenceFilter);
        assert_eq!(batch.recommendations.len(), 1);
        assert_eq!(batch.recommendations[0].course.id, "course2");
    }

    #[tokio::test]
    async fn test_backend_failure_without_fallback_is_an_error() {
        let catalog = CountingCatalog::new(sample_catalog());

        let err = recommend(&catalog, &FailingBackend, &prefs(&["databases"]), false)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Ai(_)));
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_propagated() {
        let backend = FixedBackend(ANSWER.to_string());

        let err = recommend(&FailingCatalog, &backend, &prefs(&["Databases"]), true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_invalid_preferences_rejected_before_backend_call() {
        let catalog = CountingCatalog::new(sample_catalog());
        let backend = FixedBackend(ANSWER.to_string());

        let err = recommend(&catalog, &backend, &prefs(&[]), true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(catalog.calls(), 0);
    }

    #[test]
    fn test_batch_serializes_source_and_error() {
        let batch = RecommendationBatch::unreadable_answer(ExtractionError::NoArrayFound);
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["source"], "ai");
        assert_eq!(value["extractionError"]["kind"], "no_array_found");
        assert_eq!(value["recommendations"], serde_json::json!([]));

        let ok = RecommendationBatch::from_ai(Vec::new());
        let value = serde_json::to_value(&ok).unwrap();
        assert!(value.get("extractionError").is_none());
    }
}
