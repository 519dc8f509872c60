//! Catalog and configuration summary.

use super::search::SearchEngine;
use crate::catalog::SearchLanguage;
use crate::search::ScoringWeights;
use serde::Serialize;

/// Catalog size and the settings a search runs with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogInfo {
    /// `None` when the store cannot report its size
    pub entries: Option<usize>,
    pub result_limit: usize,
    pub language: SearchLanguage,
    pub weights: ScoringWeights,
}

/// Summarize the engine's catalog and settings for the `catalog_info` tool.
pub fn handle_catalog_info(engine: &SearchEngine) -> CatalogInfo {
    CatalogInfo {
        entries: engine.store().entry_count(),
        result_limit: engine.retriever().limit(),
        language: engine.retriever().language(),
        weights: *engine.scorer().weights(),
    }
}
