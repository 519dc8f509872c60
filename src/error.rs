//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for application plumbing.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` where configuration and catalog files are loaded.
pub type Result<T> = anyhow::Result<T>;

/// A catalog store query failed.
///
/// Retrieval treats this as an empty stage and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("catalog query failed: {0}")]
    Query(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// A search request could not be served.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("malformed request body: {0}")]
    MalformedRequest(#[from] serde_json::Error),
    #[error("request body is empty")]
    EmptyRequest,
    #[error("request cancelled")]
    Cancelled,
}

/// Loading the catalog or configuration failed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("catalog entry #{index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
    #[error("weight for {category} must not be negative (got {value})")]
    InvalidWeight { category: &'static str, value: f64 },
}
