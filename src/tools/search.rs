//! Fastener search handler.
//!
//! Builds tokens from the request's intent, retrieves candidates in stages,
//! ranks them, and wraps the result in the response envelope.

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::error::SearchError;
use crate::search::{Scorer, StagedRetriever, TokenSet, rank};
use crate::types::{ErrorBody, QueryType, SearchMetadata, SearchRequest, SearchResponse};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Status code of a successful reply.
pub const STATUS_OK: u16 = 200;
/// Status code of every failed reply.
pub const STATUS_ERROR: u16 = 500;
const INTERNAL_ERROR: &str = "Internal error";

/// Shared, immutable search state: the store plus retrieval and scoring settings.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn CatalogStore>,
    retriever: StagedRetriever,
    scorer: Scorer,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("retriever", &self.retriever)
            .field("scorer", &self.scorer)
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    pub fn new(store: Arc<dyn CatalogStore>, retriever: StagedRetriever, scorer: Scorer) -> Self {
        Self {
            store,
            retriever,
            scorer,
        }
    }

    /// Engine with the retriever and scorer the config describes.
    pub fn from_config(store: Arc<dyn CatalogStore>, config: &Config) -> Self {
        Self::new(store, config.retriever(), config.scorer())
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    pub const fn retriever(&self) -> &StagedRetriever {
        &self.retriever
    }

    pub const fn scorer(&self) -> &Scorer {
        &self.scorer
    }
}

/// Status code plus JSON body, the transport-neutral reply.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReply {
    pub status: u16,
    pub body: Value,
}

impl SearchReply {
    fn encode<T: serde::Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self {
                status: STATUS_ERROR,
                body: serde_json::json!({ "error": INTERNAL_ERROR, "details": e.to_string() }),
            },
        }
    }

    /// Status 200 with the serialized response.
    pub fn ok(response: &SearchResponse) -> Self {
        Self::encode(STATUS_OK, response)
    }

    /// `{"error": "Internal error", "details": ...}` with status 500.
    pub fn internal_error(details: &dyn std::fmt::Display) -> Self {
        let body = ErrorBody {
            error: INTERNAL_ERROR.to_string(),
            details: details.to_string(),
        };
        Self::encode(STATUS_ERROR, &body)
    }

    pub const fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Run one search request.
pub async fn handle_search(
    engine: &SearchEngine,
    request: SearchRequest,
    cancel: &CancellationToken,
) -> Result<SearchResponse, SearchError> {
    let started = Instant::now();
    let intent = &request.user_intent;
    let tokens = TokenSet::from_intent(intent);
    tracing::debug!(tokens = ?tokens, "Built search tokens");

    let retrieval = engine
        .retriever
        .retrieve(engine.store(), &tokens, cancel)
        .await;
    if retrieval.trace.was_cancelled() {
        tracing::info!("Search cancelled: {:?}", request.search_query);
        return Err(SearchError::Cancelled);
    }

    let used_fallback = retrieval.used_fallback();
    let winning_stage = retrieval.trace.winning_stage();
    let results = rank(
        retrieval.entries,
        &tokens,
        &engine.scorer,
        &request.search_query,
    );

    let search_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        query = %request.search_query,
        results = results.len(),
        stage = ?winning_stage,
        used_fallback,
        search_time_ms,
        "Search completed"
    );

    Ok(SearchResponse {
        search_metadata: SearchMetadata {
            query_type: if intent.is_simple_parsed() {
                QueryType::Simple
            } else {
                QueryType::Complex
            },
            total_results: results.len(),
            search_time_ms,
            used_fallback,
        },
        results,
    })
}

/// Parse a raw JSON body and run it, mapping every failure to a 500 reply.
pub async fn handle_raw(engine: &SearchEngine, body: &str, cancel: &CancellationToken) -> SearchReply {
    let outcome = match parse_request(body) {
        Ok(request) => handle_search(engine, request, cancel).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(response) => SearchReply::ok(&response),
        Err(e) => {
            tracing::error!("Search request failed: {e}");
            SearchReply::internal_error(&e)
        }
    }
}

/// Decode a request body. Blank bodies are rejected.
pub fn parse_request(body: &str) -> Result<SearchRequest, SearchError> {
    if body.trim().is_empty() {
        return Err(SearchError::EmptyRequest);
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::types::{CatalogEntry, UserIntent};
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};

    #[fixture]
    fn engine() -> SearchEngine {
        let catalog = InMemoryCatalog::new(vec![
            CatalogEntry::new("B1", "Болт M8x100 DIN 933 цинк"),
            CatalogEntry::new("B2", "Болт M10x50"),
        ]);
        SearchEngine::from_config(Arc::new(catalog), &Config::default())
    }

    #[rstest]
    #[tokio::test]
    async fn test_simple_query_type(engine: SearchEngine) {
        let request = SearchRequest {
            search_query: "болт м8".to_string(),
            user_intent: UserIntent::default().with_type("болт").simple_parsed(true),
        };
        let_assert!(Ok(response) = handle_search(&engine, request, &CancellationToken::new()).await);
        check!(response.search_metadata.query_type == QueryType::Simple);
        check!(response.search_metadata.total_results == 2);
        check!(!response.search_metadata.used_fallback);
    }

    #[rstest]
    #[tokio::test]
    async fn test_cancelled_request(engine: SearchEngine) {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let request = SearchRequest {
            search_query: "болт".to_string(),
            user_intent: UserIntent::default().with_type("болт"),
        };
        let_assert!(Err(SearchError::Cancelled) = handle_search(&engine, request, &cancel).await);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("{not json")]
    #[case(r#"{"user_intent": "болт"}"#)]
    #[tokio::test]
    async fn test_bad_body_is_internal_error(engine: SearchEngine, #[case] body: &str) {
        let reply = handle_raw(&engine, body, &CancellationToken::new()).await;
        check!(reply.status == STATUS_ERROR);
        check!(reply.body["error"] == "Internal error");
        check!(reply.body["details"].as_str().is_some_and(|d| !d.is_empty()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_raw_reply_shape(engine: SearchEngine) {
        let body = r#"{"search_query": "болт M8x100", "user_intent": {"type": "болт", "diameter": "M8", "length": "100"}}"#;
        let reply = handle_raw(&engine, body, &CancellationToken::new()).await;
        check!(reply.is_success());
        check!(reply.body["search_metadata"]["query_type"] == "complex");
        check!(reply.body["results"][0]["sku"] == "B1");
        check!(reply.body["results"][0]["search_query"] == "болт M8x100");
    }

    #[test]
    fn test_parse_request_defaults() {
        let_assert!(Ok(request) = parse_request("{}"));
        check!(request.search_query.is_empty());
        check!(request.user_intent == UserIntent::default());
    }
}
