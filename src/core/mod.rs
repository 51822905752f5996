use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::config::AppConfig;
use crate::llm::{OllamaExtractor, QueryExtractor};
use crate::query::{ParsedQuery, QueryOutcome};
use crate::rank::{rank, score_all, RankedResult};
use crate::source::{ResultProvider, SampleProvider, SearchResult, Source};

/// Everything the presentation layer needs from one search: the canonical
/// query, the unioned result set, per-result scores, and the single best
/// candidate (absent when no source returned anything).
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    /// Set when query extraction failed and defaults were substituted.
    pub fallback_reason: Option<String>,
    pub results: Vec<SearchResult>,
    pub scored: Vec<RankedResult>,
    pub best: Option<RankedResult>,
    pub generated_at: DateTime<Utc>,
}

/// Core orchestrator wiring the extractor, cache-backed provider, and
/// ranking engine together.
pub struct PartFinder {
    extractor: Arc<dyn QueryExtractor>,
    provider: Arc<dyn ResultProvider>,
    sources: Vec<Source>,
}

impl PartFinder {
    /// Wire up the default components from configuration: an Ollama-backed
    /// extractor, the sample provider over a file cache, and the fixed
    /// source registry.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(CacheStore::new(config.cache.directory.clone()));
        info!("Cache store initialized at {}", store.directory().display());

        let extractor = Arc::new(OllamaExtractor::new(&config.llm)?);
        let provider = Arc::new(SampleProvider::new(store));

        Ok(Self {
            extractor,
            provider,
            sources: Source::registry(),
        })
    }

    /// Assemble from explicit components. Tests inject a stub extractor,
    /// a temp-dir cache, and a reduced source list through this.
    pub fn with_components(
        extractor: Arc<dyn QueryExtractor>,
        provider: Arc<dyn ResultProvider>,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            extractor,
            provider,
            sources,
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Run the full pipeline on a free-text request.
    pub async fn search(&self, user_query: &str) -> Result<SearchReport> {
        info!("Searching for: {}", user_query);

        let outcome = self.extractor.extract(user_query).await;
        if let Some(reason) = outcome.fallback_reason() {
            warn!("Proceeding with default query fields: {}", reason);
        }

        self.run_pipeline(outcome).await
    }

    /// Run the pipeline on already-structured fields, skipping the
    /// language-model collaborator entirely.
    pub async fn search_parsed(&self, parsed: ParsedQuery) -> Result<SearchReport> {
        self.run_pipeline(QueryOutcome::Parsed(parsed)).await
    }

    async fn run_pipeline(&self, outcome: QueryOutcome) -> Result<SearchReport> {
        let query = outcome.query().normalized();
        info!("Normalized query: {}", query);

        // Sequential fan-out: each (query, source) pair owns its cache
        // entry, so there is no ordering hazard.
        let mut results = Vec::new();
        for source in &self.sources {
            match self.provider.fetch(&query, source).await {
                Ok(fetched) => results.extend(fetched),
                Err(e) => {
                    warn!("Source {} failed, skipping: {}", source.id, e);
                }
            }
        }

        let scored = score_all(&results);
        let best = rank(&results);

        if best.is_none() {
            info!("No suitable products found for query: {}", query);
        }

        Ok(SearchReport {
            query,
            fallback_reason: outcome.fallback_reason().map(str::to_string),
            results,
            scored,
            best,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StaticExtractor;
    use tempfile::TempDir;

    fn finder_with(dir: &TempDir, sources: Vec<Source>) -> PartFinder {
        let store = Arc::new(CacheStore::new(dir.path()));
        PartFinder::with_components(
            Arc::new(StaticExtractor::new(ParsedQuery::new("brake pad", "Honda Civic"))),
            Arc::new(SampleProvider::new(store)),
            sources,
        )
    }

    #[tokio::test]
    async fn test_search_produces_one_result_per_source() {
        let dir = TempDir::new().unwrap();
        let sources = vec![Source::named("amazon"), Source::named("ebay"), Source::named("flipkart")];
        let finder = finder_with(&dir, sources);

        let report = finder.search("brake pads for my Civic").await.unwrap();

        assert_eq!(report.query, "brake pad for Honda Civic");
        assert_eq!(report.results.len(), 3);
        assert!(report.fallback_reason.is_none());
        assert!(report.best.is_some());
    }

    #[tokio::test]
    async fn test_search_with_no_sources_yields_no_best() {
        let dir = TempDir::new().unwrap();
        let finder = finder_with(&dir, Vec::new());

        let report = finder.search("anything").await.unwrap();

        assert!(report.results.is_empty());
        assert!(report.scored.is_empty());
        assert!(report.best.is_none());
    }

    #[tokio::test]
    async fn test_repeated_search_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let sources = vec![Source::named("amazon"), Source::named("ebay")];
        let finder = finder_with(&dir, sources);

        let first = finder.search("x").await.unwrap();
        let second = finder.search("x").await.unwrap();

        assert_eq!(first.results, second.results);
        assert_eq!(
            first.best.as_ref().map(|b| &b.result),
            second.best.as_ref().map(|b| &b.result)
        );
    }
}
