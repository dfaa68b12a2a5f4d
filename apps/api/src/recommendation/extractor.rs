//! Extractor: pulls `(course, reason)` candidates out of a free-text AI answer.
//!
//! The answer is written by a language model, so the JSON array is usually wrapped
//! in prose. We take everything from the first `[` to the last `]` and parse that.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// An unresolved recommendation as suggested by the AI backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub raw_title: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ExtractionError {
    #[error("no JSON array found in answer")]
    NoArrayFound,

    #[error("malformed JSON array in answer: {0}")]
    MalformedJson(String),
}

/// Extracts candidates in source order. Elements without a string `course` and a
/// string `reason` are skipped; they never fail the whole answer.
pub fn extract_candidates(answer: &str) -> Result<Vec<Candidate>, ExtractionError> {
    let start = answer.find('[').ok_or(ExtractionError::NoArrayFound)?;
    let end = answer.rfind(']').ok_or(ExtractionError::NoArrayFound)?;
    if end <= start {
        return Err(ExtractionError::NoArrayFound);
    }

    // '[' and ']' are single-byte, so these are char boundaries.
    let slice = &answer[start..=end];
    let elements: Vec<Value> =
        serde_json::from_str(slice).map_err(|e| ExtractionError::MalformedJson(e.to_string()))?;

    Ok(elements.iter().filter_map(candidate_from_value).collect())
}

fn candidate_from_value(value: &Value) -> Option<Candidate> {
    let raw_title = value.get("course")?.as_str()?;
    let reason = value.get("reason")?.as_str()?;
    Some(Candidate {
        raw_title: raw_title.to_string(),
        reason: reason.to_string(),
    })
}
