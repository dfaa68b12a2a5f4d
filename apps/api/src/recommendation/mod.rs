// Recommendation resolution: AI answer extraction, catalog matching, and the
// rule-based preference filter that shares their output contract.
// extractor, resolver and preference_filter are pure; service does the I/O.

pub mod extractor;
pub mod handlers;
pub mod preference_filter;
pub mod resolver;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
