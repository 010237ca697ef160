//! Category classification by ordered rule table.
//!
//! Rules are evaluated top to bottom and the first match wins. A rule
//! matches when the lowercased source label contains one of its source
//! terms, or the lowercased content field (first display value) contains
//! one of its content terms. Entries matching no rule are [`Category::Other`].
//!
//! Case studies come first: their free text routinely mentions "training"
//! or "tool", which would otherwise pull them into a later category.

use crate::types::{CatalogEntry, Category};

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Category assigned on match.
    pub category: Category,
    /// Substrings matched against the lowercased source label.
    pub source_terms: &'static [&'static str],
    /// Substrings matched against the lowercased content field.
    pub content_terms: &'static [&'static str],
}

impl CategoryRule {
    fn matches(&self, source: &str, content: &str) -> bool {
        self.source_terms.iter().any(|t| source.contains(t))
            || self.content_terms.iter().any(|t| content.contains(t))
    }
}

/// The default priority-ordered rule table.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::CaseStudies,
        source_terms: &["case-studies", "case study"],
        content_terms: &["case-studies", "case study"],
    },
    CategoryRule {
        category: Category::Tools,
        source_terms: &["cleaned sheet"],
        content_terms: &["tool", "ai tools", "software"],
    },
    CategoryRule {
        category: Category::Courses,
        source_terms: &["training program", "training"],
        content_terms: &["course", "education"],
    },
    CategoryRule {
        category: Category::ServiceProviders,
        source_terms: &["service provider profiles", "service", "provider"],
        content_terms: &["provider", "vendor", "company"],
    },
];

/// Classify an entry with the default rule table.
pub fn classify(entry: &CatalogEntry) -> Category {
    classify_with(CATEGORY_RULES, entry)
}

/// Classify an entry with a custom rule table.
pub fn classify_with(rules: &[CategoryRule], entry: &CatalogEntry) -> Category {
    let source = entry.source.to_lowercase();
    let content = entry.content_field().to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&source, &content))
        .map_or(Category::Other, |rule| rule.category)
}
