use anyhow::Context;
use fastener_search::{Config, FastenerServer, InMemoryCatalog, SearchEngine};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fastener_search::tracing::init();

    let config = Config::load().context("Failed to load configuration")?;
    let catalog = InMemoryCatalog::from_json_file(&config.catalog_path)
        .await
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path.display()))?;
    if catalog.is_empty() {
        tracing::warn!("Catalog is empty; every search will return no results");
    }

    tracing::info!(
        "Starting fastener-search MCP server ({} entries, limit {}, language {})",
        catalog.len(),
        config.result_limit,
        config.language
    );

    let engine = SearchEngine::from_config(Arc::new(catalog), &config);
    let service = FastenerServer::new(engine)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("Error serving MCP server: {:?}", e);
        })?;

    service.waiting().await?;

    Ok(())
}
