//! Candidate deduplication.
//!
//! Two rules apply, deliberately asymmetric:
//!
//! - **Exact values**: candidates with the same display-value tuple are the
//!   same record. The first one encountered (vector-search order) wins.
//! - **Tool name**: tool-category candidates with the same normalised tool
//!   name (third display value, trimmed and lowercased) are the same tool.
//!   The highest-scoring one wins regardless of order; a later, strictly
//!   higher-scoring duplicate evicts the one kept earlier.
//!
//! Accepted candidates live in an ordered slot list; the tool-name map points
//! at the slot currently holding each tool, so an eviction is O(1) and the
//! replacement is appended at the end.

use std::collections::{HashMap, HashSet};

use crate::types::{Candidate, Category};

/// Index of the tool name within a tool entry's display values.
pub const TOOL_NAME_FIELD: usize = 2;

/// Identity key used to collapse duplicate candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// The full display-value tuple.
    Exact(Vec<String>),
    /// Normalised tool name of a tool-category entry.
    ToolName(String),
}

/// The key that identifies `candidate` for deduplication.
///
/// Tool-category entries with a tool-name field are keyed by that name;
/// everything else by its exact display values.
pub fn dedup_key(candidate: &Candidate) -> DedupKey {
    if candidate.category == Category::Tools {
        if let Some(name) = candidate.entry.values.get(TOOL_NAME_FIELD) {
            return DedupKey::ToolName(name.trim().to_lowercase());
        }
    }
    DedupKey::Exact(candidate.entry.values.clone())
}

/// Collapse duplicates, preserving the order of first acceptance.
pub fn deduplicate(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut slots: Vec<Option<Candidate>> = Vec::with_capacity(candidates.len());
    let mut seen_values: HashSet<Vec<String>> = HashSet::new();
    let mut tool_slots: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        if seen_values.contains(&candidate.entry.values) {
            continue;
        }
        let values = candidate.entry.values.clone();

        match dedup_key(&candidate) {
            DedupKey::ToolName(name) => match tool_slots.get(&name).copied() {
                Some(slot) => {
                    let kept_score = slots[slot].as_ref().map_or(f64::NEG_INFINITY, |c| c.score);
                    if candidate.score > kept_score {
                        tracing::trace!(tool = %name, "higher-scoring duplicate tool replaces earlier one");
                        slots[slot] = None;
                        tool_slots.insert(name, slots.len());
                        slots.push(Some(candidate));
                    }
                }
                None => {
                    tool_slots.insert(name, slots.len());
                    slots.push(Some(candidate));
                }
            },
            DedupKey::Exact(_) => slots.push(Some(candidate)),
        }

        seen_values.insert(values);
    }

    slots.into_iter().flatten().collect()
}
