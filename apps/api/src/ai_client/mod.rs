//! AI client. Single point of entry for calls to the recommendation AI backend.
//!
//! The backend takes structured preferences and answers with free text that wraps a
//! JSON array of `{course, reason}` pairs. Turning that text into courses is the job
//! of `recommendation::extractor` and `recommendation::resolver`, not this module.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Preferences;

const RECOMMENDATION_PATH: &str = "/api/recommendation";
const MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Request body accepted by the AI backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRecommendationRequest {
    /// Credit target, or 0 when the student has none.
    pub credits: u32,
    pub categories: Vec<String>,
    pub description: String,
}

impl From<&Preferences> for AiRecommendationRequest {
    fn from(prefs: &Preferences) -> Self {
        Self {
            credits: prefs.credit_preference.unwrap_or(0),
            categories: prefs.interests.clone(),
            description: prefs.additional_info.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiAnswer {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// A backend able to produce a wrapped free-text recommendation answer.
#[async_trait]
pub trait RecommendationBackend: Send + Sync {
    async fn recommend(&self, request: &AiRecommendationRequest) -> Result<AiAnswer, AiError>;
}

/// HTTP client for the AI backend with retry on rate limiting and server errors.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
    retry_base_delay: Duration,
}

impl AiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        })
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Posts the request, retrying transport errors, 429 and 5xx with exponential backoff.
    ///
    /// A 2xx answer is returned as-is, even when blank; reading it is the extractor's job.
    pub async fn call(&self, request: &AiRecommendationRequest) -> Result<AiAnswer, AiError> {
        let url = format!("{}{}", self.base_url, RECOMMENDATION_PATH);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let error = match self.client.post(&url).json(request).send().await {
                Err(e) => AiError::Http(e),
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let answer: AiAnswer = response.json().await?;
                        debug!(answer_len = answer.answer.len(), "AI call succeeded");
                        return Ok(answer);
                    }

                    let body = response.text().await.unwrap_or_default();
                    let error = AiError::Api {
                        status: status.as_u16(),
                        message: error_message(body),
                    };
                    if !is_retryable(status) {
                        return Err(error);
                    }
                    error
                }
            };

            if attempt >= MAX_RETRIES {
                return Err(error);
            }

            // base, 2×base, 4×base ...
            let delay = self.retry_base_delay * (1 << (attempt - 1));
            warn!(
                "AI call attempt {} failed ({}), retrying after {}ms...",
                attempt,
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RecommendationBackend for AiClient {
    async fn recommend(&self, request: &AiRecommendationRequest) -> Result<AiAnswer, AiError> {
        self.call(request).await
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Pulls `message` (or `error`) out of a JSON error body, falling back to the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .unwrap_or(body)
}
