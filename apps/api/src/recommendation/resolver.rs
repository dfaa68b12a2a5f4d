//! Maps free-text course titles suggested by the AI back onto catalog courses.
//!
//! Matching tiers, tried in order per candidate (first tier with a hit wins):
//! 1. exact, case-insensitive title equality
//! 2. case-insensitive substring containment, in either direction
//! 3. significant-token overlap: at least 2 tokens longer than 3 chars, where a token
//!    pair matches if either contains the other ("system" ~ "systems")
//!
//! Within a tier the first course in snapshot order wins; tier 3 only replaces its
//! running best on a strictly higher count. Candidates that match nothing resolve to
//! `CatalogCourse::placeholder`, never to an error.
//!
//! No global assignment is attempted: several candidates may land on the same course.

use tracing::{debug, warn};

use crate::models::{CatalogCourse, ResolvedRecommendation};
use crate::recommendation::extractor::Candidate;

/// Tokens this short or shorter are ignored by tier 3.
const MAX_INSIGNIFICANT_TOKEN_LEN: usize = 3;
const MIN_TOKEN_MATCHES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Substring,
    TokenOverlap,
}

/// Lower-cased title and its significant tokens, computed once per snapshot.
struct IndexedTitle {
    lowered: String,
    tokens: Vec<String>,
}

/// Resolves candidates against one borrowed catalog snapshot.
pub struct CourseResolver<'a> {
    courses: &'a [CatalogCourse],
    index: Vec<IndexedTitle>,
}

impl<'a> CourseResolver<'a> {
    pub fn new(courses: &'a [CatalogCourse]) -> Self {
        let index = courses
            .iter()
            .map(|c| {
                let lowered = c.title.to_lowercase();
                let tokens = significant_tokens(&lowered);
                IndexedTitle { lowered, tokens }
            })
            .collect();
        Self { courses, index }
    }

    /// Finds the catalog course for a raw title, with the tier that produced it.
    pub fn match_title(&self, raw_title: &str) -> Option<(&'a CatalogCourse, MatchTier)> {
        let lowered = raw_title.to_lowercase();

        if let Some(i) = self.index.iter().position(|t| t.lowered == lowered) {
            return Some((&self.courses[i], MatchTier::Exact));
        }

        if let Some(i) = self
            .index
            .iter()
            .position(|t| t.lowered.contains(&lowered) || lowered.contains(&t.lowered))
        {
            return Some((&self.courses[i], MatchTier::Substring));
        }

        self.best_token_overlap(&lowered)
            .map(|i| (&self.courses[i], MatchTier::TokenOverlap))
    }

    fn best_token_overlap(&self, lowered: &str) -> Option<usize> {
        let candidate_tokens = significant_tokens(lowered);
        if candidate_tokens.len() < MIN_TOKEN_MATCHES {
            return None;
        }

        let mut best: Option<usize> = None;
        let mut best_count = 0;

        for (i, title) in self.index.iter().enumerate() {
            let count = candidate_tokens
                .iter()
                .filter(|w| {
                    title
                        .tokens
                        .iter()
                        .any(|t| t.contains(w.as_str()) || w.contains(t.as_str()))
                })
                .count();

            if count > best_count && count >= MIN_TOKEN_MATCHES {
                best_count = count;
                best = Some(i);
            }
        }

        best
    }

    pub fn resolve(&self, candidate: &Candidate) -> ResolvedRecommendation {
        let course = match self.match_title(&candidate.raw_title) {
            Some((course, tier)) => {
                debug!(
                    tier = ?tier,
                    candidate = %candidate.raw_title,
                    matched = %course.title,
                    "Resolved recommendation to catalog course"
                );
                course.clone()
            }
            None => {
                warn!(
                    candidate = %candidate.raw_title,
                    "No catalog course matched recommendation, using placeholder"
                );
                CatalogCourse::placeholder(&candidate.raw_title)
            }
        };

        ResolvedRecommendation {
            course,
            reason: candidate.reason.clone(),
        }
    }

    /// One output per candidate, same order.
    pub fn resolve_all(&self, candidates: &[Candidate]) -> Vec<ResolvedRecommendation> {
        candidates.iter().map(|c| self.resolve(c)).collect()
    }
}

/// Convenience wrapper: index the snapshot and resolve every candidate.
pub fn resolve_candidates(
    candidates: &[Candidate],
    courses: &[CatalogCourse],
) -> Vec<ResolvedRecommendation> {
    CourseResolver::new(courses).resolve_all(candidates)
}

/// Whitespace tokens longer than 3 characters. Expects already lower-cased input.
fn significant_tokens(lowered: &str) -> Vec<String> {
    lowered
        .split_whitespace()
        .filter(|w| w.chars().count() > MAX_INSIGNIFICANT_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}
