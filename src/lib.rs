//! Fastener catalog search: normalizes fastener notation, retrieves catalog
//! candidates in fallback stages, and ranks them by match probability.

pub mod catalog;
pub mod config;
pub mod error;
pub mod search;
pub mod server;
pub mod tools;
pub mod tracing;
pub mod types;

pub use catalog::{CatalogStore, InMemoryCatalog, PatternFilter, PatternQuery, SearchLanguage, TextQuery};
pub use config::Config;
pub use error::{LoadError, Result, SearchError, StoreError};
pub use server::FastenerServer;
pub use tools::search::{SearchEngine, SearchReply, handle_raw, handle_search};
pub use types::{CatalogEntry, RankedResult, SearchRequest, SearchResponse, UserIntent};
