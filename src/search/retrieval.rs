//! Staged candidate retrieval.
//!
//! Stages run in a fixed order and each one runs only if every earlier stage
//! came back empty. The first non-empty stage wins; results are never merged
//! across stages.
//!
//! | stage | operation    | tokens                |
//! |-------|--------------|-----------------------|
//! | 1     | text search  | type + any size token |
//! | 2     | text search  | type                  |
//! | 3     | text search  | size                  |
//! | 4     | pattern      | standard (OR)         |
//! | 5     | pattern      | coating (OR)          |
//!
//! A failing query is logged and treated as empty.

use super::tokens::TokenSet;
use crate::catalog::{CatalogStore, PatternFilter, PatternQuery, SearchLanguage, TextQuery};
use crate::error::StoreError;
use crate::types::CatalogEntry;
use serde::Serialize;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Websearch keyword joining alternative groups.
const OR: &str = " or ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TypeAndSize,
    TypeOnly,
    SizeOnly,
    Standard,
    Coating,
}

impl Stage {
    pub const ALL: [Self; 5] = [
        Self::TypeAndSize,
        Self::TypeOnly,
        Self::SizeOnly,
        Self::Standard,
        Self::Coating,
    ];

    /// One-based position in the fallback chain.
    pub const fn number(self) -> u8 {
        match self {
            Self::TypeAndSize => 1,
            Self::TypeOnly => 2,
            Self::SizeOnly => 3,
            Self::Standard => 4,
            Self::Coating => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TypeAndSize => "type+size",
            Self::TypeOnly => "type",
            Self::SizeOnly => "size",
            Self::Standard => "standard",
            Self::Coating => "coating",
        };
        write!(f, "stage {} ({})", self.number(), name)
    }
}

/// What happened at one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    /// No tokens for this stage
    Skipped,
    Hits { count: usize },
    Empty,
    Failed { error: String },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    /// Query text or rendered filter; empty when skipped
    pub query: String,
    #[serde(flatten)]
    pub outcome: StageOutcome,
}

/// Structured record of a retrieval run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetrievalTrace {
    pub stages: Vec<StageReport>,
}

impl RetrievalTrace {
    /// Stages that actually issued a query.
    pub fn executed(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| !matches!(s.outcome, StageOutcome::Skipped | StageOutcome::Cancelled))
            .count()
    }

    /// The stage whose results were returned.
    pub fn winning_stage(&self) -> Option<Stage> {
        self.stages
            .iter()
            .find(|s| matches!(s.outcome, StageOutcome::Hits { .. }))
            .map(|s| s.stage)
    }

    pub fn was_cancelled(&self) -> bool {
        self.stages
            .iter()
            .any(|s| s.outcome == StageOutcome::Cancelled)
    }
}

/// Candidates plus how they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Retrieval {
    pub entries: Vec<CatalogEntry>,
    pub trace: RetrievalTrace,
}

impl Retrieval {
    /// More than one stage issued a query before results (or exhaustion).
    pub fn used_fallback(&self) -> bool {
        self.trace.executed() > 1
    }
}

/// A prepared store query for one stage.
enum StageQuery {
    Text(TextQuery),
    Pattern(PatternQuery),
}

impl StageQuery {
    fn describe(&self) -> String {
        match self {
            Self::Text(q) => q.text.clone(),
            Self::Pattern(q) => q.filter.to_string(),
        }
    }
}

/// Staged fallback retrieval against a [`CatalogStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedRetriever {
    language: SearchLanguage,
    limit: usize,
}

impl StagedRetriever {
    pub const fn new(language: SearchLanguage, limit: usize) -> Self {
        Self { language, limit }
    }

    /// Row cap applied to every stage query.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    pub const fn language(&self) -> SearchLanguage {
        self.language
    }

    /// Run the stages in order until one yields candidates.
    ///
    /// Stops issuing queries once `cancel` fires; a cancelled run returns no
    /// candidates.
    pub async fn retrieve(
        &self,
        store: &dyn CatalogStore,
        tokens: &TokenSet,
        cancel: &CancellationToken,
    ) -> Retrieval {
        let mut trace = RetrievalTrace::default();

        for stage in Stage::ALL {
            let Some(query) = self.stage_query(stage, tokens) else {
                trace.stages.push(StageReport {
                    stage,
                    query: String::new(),
                    outcome: StageOutcome::Skipped,
                });
                continue;
            };
            let description = query.describe();

            if cancel.is_cancelled() {
                tracing::debug!("{stage}: cancelled before query");
                trace.stages.push(StageReport {
                    stage,
                    query: description,
                    outcome: StageOutcome::Cancelled,
                });
                return Retrieval {
                    entries: Vec::new(),
                    trace,
                };
            }

            tracing::debug!("{stage}: {description}");
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                result = run(store, &query) => Some(result),
            };

            let outcome = match result {
                None => {
                    tracing::debug!("{stage}: cancelled during query");
                    trace.stages.push(StageReport {
                        stage,
                        query: description,
                        outcome: StageOutcome::Cancelled,
                    });
                    return Retrieval {
                        entries: Vec::new(),
                        trace,
                    };
                }
                Some(Err(e)) => {
                    tracing::warn!("{stage} failed, continuing: {e}");
                    StageOutcome::Failed {
                        error: e.to_string(),
                    }
                }
                Some(Ok(entries)) if entries.is_empty() => StageOutcome::Empty,
                Some(Ok(entries)) => {
                    let entries = dedup_by_sku(entries);
                    tracing::debug!("{stage}: {} candidates", entries.len());
                    trace.stages.push(StageReport {
                        stage,
                        query: description,
                        outcome: StageOutcome::Hits {
                            count: entries.len(),
                        },
                    });
                    return Retrieval { entries, trace };
                }
            };

            trace.stages.push(StageReport {
                stage,
                query: description,
                outcome,
            });
        }

        tracing::debug!("no stage produced candidates");
        Retrieval {
            entries: Vec::new(),
            trace,
        }
    }

    /// The query a stage would issue, or `None` when it has no tokens.
    fn stage_query(&self, stage: Stage, tokens: &TokenSet) -> Option<StageQuery> {
        let text = |text: String| {
            StageQuery::Text(TextQuery {
                text,
                language: self.language,
                limit: self.limit,
            })
        };
        let pattern = |values: &[String]| {
            StageQuery::Pattern(PatternQuery {
                filter: PatternFilter::contains_any(values),
                limit: self.limit,
            })
        };

        match stage {
            Stage::TypeAndSize => {
                let type_token = tokens.type_token()?;
                if tokens.size().is_empty() {
                    return None;
                }
                let groups: Vec<String> = tokens
                    .size()
                    .iter()
                    .map(|size| format!("{type_token} {size}"))
                    .collect();
                Some(text(groups.join(OR)))
            }
            Stage::TypeOnly => tokens.type_token().map(|t| text(t.to_string())),
            Stage::SizeOnly => {
                (!tokens.size().is_empty()).then(|| text(tokens.size().join(OR)))
            }
            Stage::Standard => {
                (!tokens.standard().is_empty()).then(|| pattern(tokens.standard()))
            }
            Stage::Coating => (!tokens.coating().is_empty()).then(|| pattern(tokens.coating())),
        }
    }
}

async fn run(store: &dyn CatalogStore, query: &StageQuery) -> Result<Vec<CatalogEntry>, StoreError> {
    match query {
        StageQuery::Text(q) => store.text_search(q).await,
        StageQuery::Pattern(q) => store.pattern_search(q).await,
    }
}

/// Keep the first entry for every `sku`, preserving order.
fn dedup_by_sku(entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    let mut seen = ahash::AHashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|e| seen.insert(e.sku.clone()))
        .collect()
}
