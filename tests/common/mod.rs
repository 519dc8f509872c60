//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `catalog`: a small in-memory catalog of bolts, nuts, washers and screws
//! - `engine`: a [`SearchEngine`] over `catalog` with default settings
//!
//! [`MockStore`] is a scripted store that counts calls per operation and can
//! fail or stall on demand, for exercising the retrieval stages directly.

use fastener_search::catalog::{CatalogStore, InMemoryCatalog, PatternQuery, TextQuery};
use fastener_search::{CatalogEntry, Config, SearchEngine, StoreError};
use futures::FutureExt;
use futures::future::BoxFuture;
use rstest::fixture;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted store reply.
#[allow(dead_code)] // Variants used across different integration test crates
#[derive(Debug, Clone)]
pub enum Reply {
    Rows(Vec<CatalogEntry>),
    Fail(StoreError),
    /// Never resolves; only cancellation ends the call
    Hang,
}

/// Scripted [`CatalogStore`].
///
/// Each operation pops replies from its own queue; an exhausted queue answers
/// with no rows. Every call's query text (or rendered filter) is recorded.
#[derive(Debug, Default)]
pub struct MockStore {
    text_replies: Mutex<VecDeque<Reply>>,
    pattern_replies: Mutex<VecDeque<Reply>>,
    text_calls: AtomicUsize,
    pattern_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(self, reply: Reply) -> Self {
        self.text_replies
            .lock()
            .expect("mock lock")
            .push_back(reply);
        self
    }

    pub fn on_pattern(self, reply: Reply) -> Self {
        self.pattern_replies
            .lock()
            .expect("mock lock")
            .push_back(reply);
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn pattern_calls(&self) -> usize {
        self.pattern_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.text_calls() + self.pattern_calls()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("mock lock").clone()
    }

    fn answer<'a>(
        &'a self,
        queue: &'a Mutex<VecDeque<Reply>>,
        counter: &'a AtomicUsize,
        query: String,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, StoreError>> {
        counter.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().expect("mock lock").push(query);
        let reply = queue.lock().expect("mock lock").pop_front();
        async move {
            match reply {
                None => Ok(Vec::new()),
                Some(Reply::Rows(rows)) => Ok(rows),
                Some(Reply::Fail(e)) => Err(e),
                Some(Reply::Hang) => futures::future::pending().await,
            }
        }
        .boxed()
    }
}

impl CatalogStore for MockStore {
    fn text_search<'a>(
        &'a self,
        query: &'a TextQuery,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, StoreError>> {
        self.answer(&self.text_replies, &self.text_calls, query.text.clone())
    }

    fn pattern_search<'a>(
        &'a self,
        query: &'a PatternQuery,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, StoreError>> {
        self.answer(
            &self.pattern_replies,
            &self.pattern_calls,
            query.filter.to_string(),
        )
    }
}

/// Rows helper for scripted replies.
#[allow(dead_code)]
pub fn rows(entries: &[(&str, &str)]) -> Reply {
    Reply::Rows(
        entries
            .iter()
            .map(|(sku, name)| CatalogEntry::new(*sku, *name))
            .collect(),
    )
}

/// Engine over a mock store, keeping a handle for call inspection.
#[allow(dead_code)]
pub fn mock_engine(store: MockStore) -> (SearchEngine, Arc<MockStore>) {
    let store = Arc::new(store);
    let engine = SearchEngine::from_config(store.clone(), &Config::default());
    (engine, store)
}

#[fixture]
pub fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
        CatalogEntry::new("B-933-8-100-ZN", "Болт M8x100 DIN 933 цинк"),
        CatalogEntry::new("B-933-8-80-ZN", "Болт М8х80 DIN 933 оцинкованный"),
        CatalogEntry::new("B-931-10-60", "Болт M10x60 DIN 931 8.8"),
        CatalogEntry::new("B-933-8-100-A2", "Болт M8x100 DIN 933 нерж A2"),
        CatalogEntry::new("N-934-8-ZN", "Гайка M8 DIN 934 цинк"),
        CatalogEntry::new("W-125-8", "Шайба 8 DIN 125"),
        CatalogEntry::new("S-7981-4.2-16", "Саморез 4,2x16 DIN 7981 оцинкованный"),
    ])
}

#[fixture]
pub fn engine(catalog: InMemoryCatalog) -> SearchEngine {
    SearchEngine::from_config(Arc::new(catalog), &Config::default())
}
