//! Ranking of retrieved candidates.

use super::analyze::MatchAnalysis;
use super::scoring::Scorer;
use super::tokens::TokenSet;
use crate::types::{CatalogEntry, RankedResult};

/// One-sentence reasons, in priority order.
pub const REASON_TYPE_AND_SIZE: &str = "type and size match";
pub const REASON_TYPE: &str = "type match";
pub const REASON_STANDARD: &str = "standard match";
pub const REASON_SIZE: &str = "size match";
pub const REASON_MATERIAL_OR_GRADE: &str = "material or grade match";
pub const REASON_COATING: &str = "coating match";
pub const REASON_PARTIAL: &str = "partial match by name";

/// First satisfied reason in priority order.
pub const fn match_reason(analysis: &MatchAnalysis) -> &'static str {
    if analysis.type_match && analysis.size_match {
        REASON_TYPE_AND_SIZE
    } else if analysis.type_match {
        REASON_TYPE
    } else if analysis.standard_match {
        REASON_STANDARD
    } else if analysis.size_match {
        REASON_SIZE
    } else if analysis.material_match || analysis.grade_match {
        REASON_MATERIAL_OR_GRADE
    } else if analysis.coating_match {
        REASON_COATING
    } else {
        REASON_PARTIAL
    }
}

/// Score every candidate and sort by score, highest first.
///
/// The sort is stable: equal scores keep retrieval order. Nothing is dropped.
pub fn rank(
    candidates: Vec<CatalogEntry>,
    tokens: &TokenSet,
    scorer: &Scorer,
    search_query: &str,
) -> Vec<RankedResult> {
    let mut ranked: Vec<RankedResult> = candidates
        .into_iter()
        .map(|entry| {
            let analysis = MatchAnalysis::analyze(&entry.name, tokens);
            let score = scorer.explain(&analysis);
            let explanation = analysis
                .explanation
                .iter()
                .chain(score.explanation.iter())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n");

            RankedResult {
                relevance_score: score.value,
                probability_percent: score.value,
                match_reason: match_reason(&analysis).to_string(),
                explanation,
                matched_tokens: analysis.matched_tokens,
                search_query: search_query.to_string(),
                full_query: search_query.to_string(),
                entry,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    ranked
}
