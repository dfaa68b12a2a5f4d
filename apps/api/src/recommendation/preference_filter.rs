//! Rule-based recommendations built straight from structured preferences.
//!
//! Used when the AI backend is unavailable, or on request. No text matching against
//! AI output is involved; the output shape is the same as the resolver's.

use crate::models::{CatalogCourse, Preferences, ResolvedRecommendation};

const MAX_RECOMMENDATIONS: usize = 3;
const HIGH_RATING_THRESHOLD: f64 = 4.0;

/// Picks up to 3 eligible courses in snapshot order.
///
/// Eligible: some category overlaps an interest (case-insensitive containment either
/// way) and, when a credit target is set, the credits equal it exactly.
pub fn filter_by_preferences(
    courses: &[CatalogCourse],
    prefs: &Preferences,
) -> Vec<ResolvedRecommendation> {
    let interests: Vec<(&str, String)> = prefs
        .interests
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(|i| (i, i.to_lowercase()))
        .collect();

    courses
        .iter()
        .filter(|c| {
            prefs
                .credit_preference
                .map_or(true, |target| c.credits == target)
        })
        .filter_map(|c| {
            let matched = matched_interests(c, &interests);
            if matched.is_empty() {
                None
            } else {
                Some(ResolvedRecommendation {
                    course: c.clone(),
                    reason: build_reason(c, prefs, &matched),
                })
            }
        })
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

/// Interests (in preference order) that overlap at least one of the course's categories.
fn matched_interests<'i>(course: &CatalogCourse, interests: &[(&'i str, String)]) -> Vec<&'i str> {
    let categories: Vec<String> = course.categories.iter().map(|c| c.to_lowercase()).collect();

    interests
        .iter()
        .filter(|(_, lowered)| {
            categories
                .iter()
                .any(|cat| cat.contains(lowered.as_str()) || lowered.contains(cat.as_str()))
        })
        .map(|(original, _)| *original)
        .collect()
}

fn build_reason(course: &CatalogCourse, prefs: &Preferences, matched: &[&str]) -> String {
    let mut clauses = Vec::new();

    if !matched.is_empty() {
        clauses.push(format!("matches your interest in {}", matched.join(", ")));
    }
    if let Some(target) = prefs.credit_preference {
        clauses.push(format!("fits your {target}-credit target"));
    }
    if let Some(rating) = course.avg_rating.filter(|r| *r >= HIGH_RATING_THRESHOLD) {
        clauses.push(format!("is highly rated by students ({rating:.1}/5)"));
    }

    match clauses.as_slice() {
        [] => {
            let rating = course
                .avg_rating
                .map(|r| format!("{r:.1}/5"))
                .unwrap_or_else(|| "good".to_string());
            format!("This course has a {rating} rating and may suit your goals.")
        }
        [only] => format!("This course {only}."),
        [first, second] => format!("This course {first} and {second}."),
        [rest @ .., last] => format!("This course {}, and {last}.", rest.join(", ")),
    }
}
