//! In-process collaborator fakes shared by the recommendation tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ai_client::{AiAnswer, AiError, AiRecommendationRequest, RecommendationBackend};
use crate::catalog::{CatalogError, CatalogSource};
use crate::models::CatalogCourse;

pub fn course(id: &str, title: &str, credits: u32, categories: &[&str], rating: Option<f64>) -> CatalogCourse {
    CatalogCourse {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        credits,
        categories: categories.iter().map(|s| s.to_string()).collect(),
        avg_rating: rating,
    }
}

pub fn sample_catalog() -> Vec<CatalogCourse> {
    vec![
        course(
            "course1",
            "Advanced Natural Language Processing",
            6,
            &["Machine Learning and Analytics"],
            Some(4.5),
        ),
        course(
            "course2",
            "Query Optimization",
            4,
            &["Databases and Information Systems"],
            Some(4.2),
        ),
        course(
            "course3",
            "Approximation Algorithms",
            5,
            &["Algorithms"],
            None,
        ),
    ]
}

/// Backend that always answers with the same text.
pub struct FixedBackend(pub String);

#[async_trait]
impl RecommendationBackend for FixedBackend {
    async fn recommend(&self, _request: &AiRecommendationRequest) -> Result<AiAnswer, AiError> {
        Ok(AiAnswer {
            answer: self.0.clone(),
        })
    }
}

/// Backend that is always down.
pub struct FailingBackend;

#[async_trait]
impl RecommendationBackend for FailingBackend {
    async fn recommend(&self, _request: &AiRecommendationRequest) -> Result<AiAnswer, AiError> {
        Err(AiError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })
    }
}

/// Catalog that counts how often it is asked for a snapshot.
pub struct CountingCatalog {
    pub courses: Vec<CatalogCourse>,
    pub calls: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(courses: Vec<CatalogCourse>) -> Self {
        Self {
            courses,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for CountingCatalog {
    async fn list_all_courses(&self) -> Result<Vec<CatalogCourse>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.courses.clone())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Catalog whose service is down.
pub struct FailingCatalog;

#[async_trait]
impl CatalogSource for FailingCatalog {
    async fn list_all_courses(&self) -> Result<Vec<CatalogCourse>, CatalogError> {
        Err(CatalogError::Status {
            status: 500,
            message: "boom".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
