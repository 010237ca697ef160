//! Lexical intent detection and score boosting.
//!
//! Each [`IntentRule`] pairs a set of literal trigger phrases with a target
//! category and a multiplier. Boosts are applied before the minimum-score
//! filter, so a boosted candidate that was below threshold can still
//! qualify.

use crate::config::IntentRule;
use crate::types::{Candidate, Category};

/// An intent rule that fired for the current query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedIntent {
    /// Category the query asked for.
    pub category: Category,
    /// Multiplier applied to that category's candidates.
    pub boost: f64,
}

/// Return the rules whose trigger phrases occur in `query`, in table order.
///
/// Matching is a case-insensitive substring test. A category listed by
/// several matching rules is reported once, with its first rule's boost.
pub fn detect_intents(query: &str, rules: &[IntentRule]) -> Vec<DetectedIntent> {
    let query = query.to_lowercase();
    let mut detected: Vec<DetectedIntent> = Vec::new();

    for rule in rules {
        let fired = rule
            .triggers
            .iter()
            .map(|t| t.trim().to_lowercase())
            .any(|t| !t.is_empty() && query.contains(&t));
        if fired && !detected.iter().any(|d| d.category == rule.category) {
            detected.push(DetectedIntent {
                category: rule.category,
                boost: rule.boost,
            });
        }
    }

    detected
}

/// Multiply the score of every candidate in a detected category.
pub fn apply_boosts(candidates: &mut [Candidate], intents: &[DetectedIntent]) {
    if intents.is_empty() {
        return;
    }
    for candidate in candidates.iter_mut() {
        if let Some(intent) = intents.iter().find(|i| i.category == candidate.category) {
            candidate.score *= intent.boost;
            candidate.boosted = true;
        }
    }
}
