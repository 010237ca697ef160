//! Display form of ranked results: titles, type labels, links and slugs.
//!
//! The ranking core returns entries with their computed category; this
//! module turns each one into what a client renders. A result whose title
//! comes out empty is logged and dropped, never failing the response.

use std::sync::Arc;

use catalog_search::{CatalogEntry, Category, RankedResult};
use serde::{Deserialize, Serialize};

use crate::config::LinkConfig;
use crate::error::{FinderError, Result};

/// A ranked result ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedResult {
    /// 1-based position in the response.
    pub rank: usize,
    pub title: String,
    /// `TOOL`, `COURSE`, `SERVICE PROVIDER`, `CASE STUDY` or `OTHER`.
    pub category_type: String,
    pub category: Category,
    pub url: String,
    pub slug: String,
    pub score: f64,
    /// Score before intent boosting.
    pub base_score: f64,
    pub semantic_score: f64,
    pub keyword_score: f64,
    pub boosted: bool,
    /// Source sheet label of the entry.
    pub source: String,
    pub metadata: Arc<CatalogEntry>,
}

/// Upper-case type label for a category.
#[must_use]
pub fn category_type(category: Category) -> &'static str {
    match category {
        Category::Tools => "TOOL",
        Category::Courses => "COURSE",
        Category::ServiceProviders => "SERVICE PROVIDER",
        Category::CaseStudies => "CASE STUDY",
        Category::Other => "OTHER",
    }
}

/// Strip list markers and trailing parentheticals from a case-study title.
///
/// `"Armman - Maternal health (India)"` becomes `"Armman Maternal health"`.
#[must_use]
pub fn clean_case_study_title(raw: &str) -> String {
    let without_markers = raw.replace("- ", "");
    without_markers
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned()
}

fn joined(values: &[String]) -> String {
    values.join(" | ")
}

/// Display title for an entry of the given category.
#[must_use]
pub fn title_for(entry: &CatalogEntry, category: Category) -> String {
    let values = &entry.values;
    match category {
        Category::Tools | Category::Courses => values
            .get(2)
            .map_or_else(|| joined(values), |v| v.trim().to_owned()),
        Category::ServiceProviders => values
            .first()
            .map_or_else(|| joined(values), |v| v.trim().to_owned()),
        Category::CaseStudies => values
            .first()
            .map_or_else(|| joined(values), |v| clean_case_study_title(v)),
        Category::Other => joined(values),
    }
}

/// URL-friendly slug: lowercase ASCII letters, digits and single hyphens.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_owned()
}

/// The last path segment of a URL, or an empty string for a bare site root.
#[must_use]
pub fn slug_from_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or_default()
            .to_owned(),
        Err(_) => raw
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned(),
    }
}

/// Builds display data for ranked results.
#[derive(Debug, Clone)]
pub struct Presenter {
    links: LinkConfig,
}

impl Presenter {
    #[must_use]
    pub fn new(links: LinkConfig) -> Self {
        Self { links }
    }

    fn base(&self) -> &str {
        self.links.base_url.trim_end_matches('/')
    }

    /// Link to an entry's page on the site.
    #[must_use]
    pub fn url_for(&self, entry: &CatalogEntry, category: Category) -> String {
        let base = self.base();
        match category {
            Category::Tools => format!("{base}/tools/{}", slugify(&title_for(entry, category))),
            Category::Courses => format!("{base}/courses/{}", slugify(&title_for(entry, category))),
            Category::ServiceProviders => {
                format!("{base}/services/{}", slugify(&title_for(entry, category)))
            }
            Category::CaseStudies => {
                let title = title_for(entry, category).to_lowercase();
                self.known_case_study(&title).map_or_else(
                    || format!("{base}/case-studies/{}", slugify(&title)),
                    str::to_owned,
                )
            }
            Category::Other => format!("{base}/"),
        }
    }

    /// Longest known title fragment that matches, in either direction.
    fn known_case_study(&self, title: &str) -> Option<&str> {
        if title.is_empty() {
            return None;
        }
        self.links
            .case_studies
            .iter()
            .filter(|(key, _)| title.contains(key.as_str()) || key.contains(title))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, url)| url.as_str())
    }

    /// Present one result at the given 1-based rank.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Presentation`] if the entry has no usable title.
    pub fn present(&self, result: &RankedResult, rank: usize) -> Result<PresentedResult> {
        let title = title_for(&result.entry, result.category);
        if title.trim().is_empty() {
            return Err(FinderError::Presentation(format!(
                "entry {} has no display title",
                result.entry.id
            )));
        }
        let url = self.url_for(&result.entry, result.category);
        let slug = slug_from_url(&url);

        Ok(PresentedResult {
            rank,
            title,
            category_type: category_type(result.category).to_owned(),
            category: result.category,
            url,
            slug,
            score: result.score,
            base_score: result.base_score,
            semantic_score: result.semantic_score,
            keyword_score: result.keyword_score,
            boosted: result.boosted,
            source: result.entry.source.clone(),
            metadata: Arc::clone(&result.entry),
        })
    }

    /// Present results in order, skipping any that fail.
    ///
    /// Ranks are assigned after skipping, so they stay contiguous.
    #[must_use]
    pub fn present_all(&self, results: &[RankedResult]) -> Vec<PresentedResult> {
        let mut presented = Vec::with_capacity(results.len());
        for result in results {
            match self.present(result, presented.len() + 1) {
                Ok(p) => presented.push(p),
                Err(e) => {
                    tracing::warn!(error = %e, id = result.entry.id, "skipping result");
                }
            }
        }
        presented
    }
}
