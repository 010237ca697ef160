//! Category stacking: group, rank groups, concatenate, truncate.
//!
//! Results are never interleaved across categories. Each category's
//! members are sorted by descending score; groups are ordered by their best
//! member's score, with categories the query explicitly asked for forced to
//! the front.

use std::cmp::Ordering;

use crate::types::{Candidate, Category, RankedResult};

/// A per-query bucket of candidates sharing one category.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    /// The group's category.
    pub category: Category,
    /// Members sorted by descending score.
    pub members: Vec<Candidate>,
    /// Highest member score, used to rank groups.
    pub top_score: f64,
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Bucket candidates by category.
///
/// Returns the non-empty groups in enumeration order, each sorted by
/// descending score. Sorting is stable, so equal scores keep their input
/// order.
pub fn group_by_category(candidates: Vec<Candidate>) -> Vec<CategoryGroup> {
    let mut buckets: Vec<Vec<Candidate>> = vec![Vec::new(); Category::all().len()];
    for candidate in candidates {
        buckets[candidate.category.ordinal()].push(candidate);
    }

    Category::all()
        .iter()
        .zip(buckets)
        .filter(|(_, members)| !members.is_empty())
        .map(|(&category, mut members)| {
            members.sort_by(|a, b| by_score_desc(a.score, b.score));
            let top_score = members[0].score;
            CategoryGroup {
                category,
                members,
                top_score,
            }
        })
        .collect()
}

/// Order groups by best score, then pull promoted categories to the front.
///
/// The score sort is stable over enumeration order, so tied groups keep
/// that order. Promoted categories appear first, in the order given.
pub fn rank_groups(mut groups: Vec<CategoryGroup>, promoted: &[Category]) -> Vec<CategoryGroup> {
    groups.sort_by(|a, b| by_score_desc(a.top_score, b.top_score));

    if promoted.is_empty() {
        return groups;
    }

    let mut front: Vec<CategoryGroup> = Vec::new();
    for category in promoted {
        if let Some(position) = groups.iter().position(|g| g.category == *category) {
            front.push(groups.remove(position));
        }
    }
    front.extend(groups);
    front
}

/// Group, rank and concatenate candidates, then apply the optional cap.
pub fn stack(
    candidates: Vec<Candidate>,
    promoted: &[Category],
    limit: Option<usize>,
) -> Vec<RankedResult> {
    let groups = rank_groups(group_by_category(candidates), promoted);

    let stacked = groups
        .into_iter()
        .flat_map(|group| group.members)
        .map(RankedResult::from);

    match limit {
        Some(limit) => stacked.take(limit).collect(),
        None => stacked.collect(),
    }
}
