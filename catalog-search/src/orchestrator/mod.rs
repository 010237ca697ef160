//! Search orchestrator: concurrent retrieval, fusion, boosting, dedup, stacking.
//!
//! Vector search and keyword scoring run concurrently for each query. Their
//! outputs are fused into one score per candidate, boosted when the query
//! names a category, filtered by threshold, deduplicated, and stacked into
//! contiguous category groups.

pub mod classify;
pub mod dedup;
pub mod intent;
pub mod scoring;
pub mod search;
pub mod stacking;
