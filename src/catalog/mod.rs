//! Catalog store interface.
//!
//! The store is a read-only collaborator offering two operations: a ranked
//! full-text search under a language configuration, and case-insensitive
//! "contains" pattern filters combinable with OR, AND and NOT. Both take a
//! row cap. [`InMemoryCatalog`] is the bundled implementation.

mod memory;
mod pattern;

pub use memory::InMemoryCatalog;
pub use pattern::LikePattern;

use crate::error::StoreError;
use crate::types::CatalogEntry;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language configuration for full-text search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchLanguage {
    /// Russian morphology (stemmed lexemes)
    #[default]
    Russian,
    /// Lower-cased words, no stemming
    Simple,
}

impl fmt::Display for SearchLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Russian => f.write_str("russian"),
            Self::Simple => f.write_str("simple"),
        }
    }
}

/// Websearch-style free-text query.
///
/// Words are ANDed; the bare word `or` separates alternative groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    pub text: String,
    pub language: SearchLanguage,
    pub limit: usize,
}

/// Boolean combination of `ILIKE` predicates on the entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternFilter {
    Like(LikePattern),
    Any(Vec<PatternFilter>),
    All(Vec<PatternFilter>),
    Not(Box<PatternFilter>),
}

impl PatternFilter {
    /// OR of "name contains token" predicates, tokens escaped.
    pub fn contains_any<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self::Any(
            tokens
                .iter()
                .map(|t| Self::Like(LikePattern::contains(t.as_ref())))
                .collect(),
        )
    }

    /// Evaluate against a name.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Like(pattern) => pattern.matches(name),
            Self::Any(filters) => filters.iter().any(|f| f.matches(name)),
            Self::All(filters) => filters.iter().all(|f| f.matches(name)),
            Self::Not(filter) => !filter.matches(name),
        }
    }
}

impl fmt::Display for PatternFilter {
    /// PostgREST-like rendering, used in logs and retrieval traces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, op: &str, filters: &[PatternFilter]) -> fmt::Result {
            write!(f, "{op}(")?;
            for (i, filter) in filters.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{filter}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Like(pattern) => write!(f, "name.ilike.{pattern}"),
            Self::Any(filters) => join(f, "or", filters),
            Self::All(filters) => join(f, "and", filters),
            Self::Not(filter) => write!(f, "not.{filter}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternQuery {
    pub filter: PatternFilter,
    pub limit: usize,
}

/// Read-only access to the parts catalog.
pub trait CatalogStore: Send + Sync {
    fn text_search<'a>(
        &'a self,
        query: &'a TextQuery,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, StoreError>>;

    fn pattern_search<'a>(
        &'a self,
        query: &'a PatternQuery,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, StoreError>>;

    /// Number of entries, when the backend knows it cheaply.
    fn entry_count(&self) -> Option<usize> {
        None
    }
}
