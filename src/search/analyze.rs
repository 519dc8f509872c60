//! Per-candidate match analysis.

use super::normalize::normalize;
use super::tokens::{Category, TokenSet};
use serde::Serialize;

/// Which token categories a catalog name matched, and with which tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchAnalysis {
    pub type_match: bool,
    pub standard_match: bool,
    pub size_match: bool,
    pub coating_match: bool,
    pub material_match: bool,
    pub grade_match: bool,
    /// Every matched token, grouped by category in analysis order
    pub matched_tokens: Vec<String>,
    /// One line per matched category
    pub explanation: Vec<String>,
}

impl MatchAnalysis {
    /// Analyze `name` against every category of `tokens`.
    ///
    /// Standard tokens are already lower-cased codes and are compared as is;
    /// tokens of every other category are normalized before the substring test.
    pub fn analyze(name: &str, tokens: &TokenSet) -> Self {
        let normalized = normalize(name);
        let mut analysis = Self::default();

        for category in Category::ALL {
            let matched: Vec<&String> = tokens
                .category(category)
                .iter()
                .filter(|token| match category {
                    Category::Standard => normalized.contains(token.as_str()),
                    _ => normalized.contains(&normalize(token)),
                })
                .collect();

            if matched.is_empty() {
                continue;
            }

            analysis.set(category, true);
            analysis.explanation.push(format!(
                "{} match: {}",
                category.as_str(),
                matched
                    .iter()
                    .map(|t| format!("\"{t}\""))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            analysis
                .matched_tokens
                .extend(matched.into_iter().cloned());
        }

        tracing::debug!(
            entry = name,
            normalized = %normalized,
            categories = analysis.matched_count(),
            matched = ?analysis.matched_tokens,
            "analyzed candidate"
        );

        analysis
    }

    pub const fn is_match(&self, category: Category) -> bool {
        match category {
            Category::Type => self.type_match,
            Category::Standard => self.standard_match,
            Category::Size => self.size_match,
            Category::Coating => self.coating_match,
            Category::Material => self.material_match,
            Category::Grade => self.grade_match,
        }
    }

    pub const fn set(&mut self, category: Category, matched: bool) {
        match category {
            Category::Type => self.type_match = matched,
            Category::Standard => self.standard_match = matched,
            Category::Size => self.size_match = matched,
            Category::Coating => self.coating_match = matched,
            Category::Material => self.material_match = matched,
            Category::Grade => self.grade_match = matched,
        }
    }

    /// Number of categories that matched.
    pub fn matched_count(&self) -> usize {
        Category::ALL.iter().filter(|c| self.is_match(**c)).count()
    }

    /// The single matched category, if exactly one matched.
    pub fn only_match(&self) -> Option<Category> {
        let mut matched = Category::ALL.into_iter().filter(|c| self.is_match(*c));
        match (matched.next(), matched.next()) {
            (Some(category), None) => Some(category),
            _ => None,
        }
    }

    /// Analysis with the given categories set, no tokens or explanation.
    pub fn with_matches(categories: &[Category]) -> Self {
        let mut analysis = Self::default();
        for category in categories {
            analysis.set(*category, true);
        }
        analysis
    }
}
