//! Fastener matching and ranking.
//!
//! A request's structured intent is turned into per-category tokens
//! ([`TokenSet`]), candidates are pulled from the catalog in fallback stages
//! ([`StagedRetriever`]), and each candidate is analyzed, scored and sorted
//! ([`rank`]).

pub(crate) mod analyze;
pub(crate) mod normalize;
pub(crate) mod rank;
pub(crate) mod retrieval;
pub(crate) mod scoring;
pub(crate) mod size;
pub(crate) mod tokens;

pub use analyze::MatchAnalysis;
pub use normalize::normalize;
pub use rank::{match_reason, rank};
pub use retrieval::{Retrieval, RetrievalTrace, Stage, StageOutcome, StageReport, StagedRetriever};
pub use scoring::{Score, Scorer, ScoringWeights};
pub use size::size_variants;
pub use tokens::{Category, TokenSet};
