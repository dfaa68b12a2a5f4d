//! Catalog collaborator: the source of course snapshots used for resolution.
//!
//! `AppState` holds an `Arc<dyn CatalogSource>`; the concrete source is chosen at
//! startup from config (HTTP catalog service, or a static JSON snapshot).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::CatalogCourse;

const CATALOG_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can hand out the full course catalog.
///
/// Callers treat each returned `Vec` as an immutable snapshot for one batch.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_all_courses(&self) -> Result<Vec<CatalogCourse>, CatalogError>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// Catalog backed by the course service's `GET /courses` endpoint.
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(CATALOG_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn list_all_courses(&self) -> Result<Vec<CatalogCourse>, CatalogError> {
        let url = format!("{}/courses", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let courses: Vec<CatalogCourse> = response.json().await?;
        debug!(count = courses.len(), "Fetched catalog snapshot");
        Ok(courses)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Fixed in-memory catalog, typically loaded from a JSON file at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    courses: Vec<CatalogCourse>,
}

impl StaticCatalog {
    pub fn new(courses: Vec<CatalogCourse>) -> Self {
        Self { courses }
    }

    /// Loads a snapshot file containing a JSON array of courses.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let courses: Vec<CatalogCourse> = serde_json::from_str(&raw)?;
        info!(
            "Loaded static catalog snapshot from {} ({} courses)",
            path.display(),
            courses.len()
        );
        Ok(Self::new(courses))
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_all_courses(&self) -> Result<Vec<CatalogCourse>, CatalogError> {
        Ok(self.courses.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
