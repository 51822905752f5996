use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

use crate::cache::{CacheKey, CacheStore};

/// A single part listing fetched from one source.
///
/// Immutable once created; persisted verbatim in the cache as a JSON
/// object with exactly these field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub price: f64,
    pub rating: f64,
    pub link: String,
}

/// One of the fixed external catalogs/marketplaces queried for parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub display_name: String,
    /// Search URL pattern with a `{query}` placeholder. Sources without a
    /// known pattern fall back to a generic `{id}/search?q={query}` form.
    pub search_url_template: Option<String>,
}

impl Source {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        search_url_template: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            search_url_template: search_url_template.map(str::to_string),
        }
    }

    /// Named source with no known search template; the generic fallback
    /// URL form applies. Used for ad-hoc source lists.
    pub fn named(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            search_url_template: None,
            id,
        }
    }

    /// Build the search URL for a query, percent-encoding the query text.
    pub fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        match &self.search_url_template {
            Some(template) => template.replace("{query}", &encoded),
            None => format!("{}/search?q={}", self.id, encoded),
        }
    }

    /// The fixed registry of supported part marketplaces.
    pub fn registry() -> Vec<Source> {
        vec![
            Source::new("amazon", "Amazon India", Some("https://www.amazon.in/s?k={query}")),
            Source::new("ebay", "eBay", Some("https://www.ebay.com/sch/i.html?_nkw={query}")),
            Source::new("rockauto", "RockAuto", Some("https://www.rockauto.com/en/partsearch/?partnum={query}")),
            Source::new("autozone", "AutoZone", Some("https://www.autozone.com/searchresult?searchText={query}")),
            Source::new("advanceautoparts", "Advance Auto Parts", Some("https://shop.advanceautoparts.com/web/SearchResults?searchTerm={query}")),
            Source::new("napaonline", "NAPA Auto Parts", Some("https://www.napaonline.com/en/search?text={query}")),
            Source::new("summitracing", "Summit Racing", Some("https://www.summitracing.com/search?SortBy=BestKeywordMatch&keyword={query}")),
            Source::new("eurocarparts", "Euro Car Parts", Some("https://www.eurocarparts.com/search/{query}")),
            Source::new("halfords", "Halfords", Some("https://www.halfords.com/search?q={query}")),
            Source::new("autodoc", "Autodoc UK", Some("https://www.autodoc.co.uk/search?keyword={query}")),
            Source::new("motointegrator", "Motointegrator", Some("https://www.motointegrator.com/search?q={query}")),
            Source::new("boodmo", "boodmo", Some("https://boodmo.com/search/?q={query}")),
            Source::new("gomechanic", "GoMechanic", Some("https://gomechanic.in/search?q={query}")),
            Source::new("cardekho", "CarDekho", Some("https://www.cardekho.com/search?q={query}")),
            Source::new("supercheapauto", "Supercheap Auto", Some("https://www.supercheapauto.com.au/search?q={query}")),
            Source::new("repco", "Repco", Some("https://www.repco.com.au/search?q={query}")),
            Source::new("partslink24", "PartsLink24", None),
            Source::new("tecdoc", "TecDoc Catalogue", None),
            Source::new("pricerunner", "PriceRunner", Some("https://www.pricerunner.com/search?q={query}")),
            Source::new("camelcamelcamel", "CamelCamelCamel", Some("https://camelcamelcamel.com/search?sq={query}")),
        ]
    }
}

/// Seam where a real per-source fetcher (HTTP + HTML/JSON parsing) would
/// be substituted. The contract is stable across substitution: results are
/// keyed through the cache and returned as a `SearchResult` list.
#[async_trait]
pub trait ResultProvider: Send + Sync {
    async fn fetch(&self, query: &str, source: &Source) -> Result<Vec<SearchResult>>;
}

/// Stand-in provider that synthesizes one deterministic result per
/// (query, source) pair and persists it through the cache store.
///
/// Price and rating are derived from a hash of the source identifier, so
/// repeated runs produce identical data even across processes.
pub struct SampleProvider {
    store: Arc<CacheStore>,
}

impl SampleProvider {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    /// Stable 64-bit value from the source identifier.
    fn source_seed(source_id: &str) -> u64 {
        let digest = Sha256::digest(source_id.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(bytes)
    }

    fn synthesize(query: &str, source: &Source) -> SearchResult {
        let seed = Self::source_seed(&source.id);

        SearchResult {
            name: format!("{} - Sample from {}", query, source.id),
            price: (1500 + seed % 500) as f64,
            rating: 4.0 + (seed % 10) as f64 * 0.01,
            link: source.search_url(query),
        }
    }
}

#[async_trait]
impl ResultProvider for SampleProvider {
    async fn fetch(&self, query: &str, source: &Source) -> Result<Vec<SearchResult>> {
        let key = CacheKey::derive(query, &source.id);

        if let Some(cached) = self.store.get(&key)? {
            return Ok(cached);
        }

        debug!("Synthesizing sample result for source: {}", source.id);
        let results = vec![Self::synthesize(query, source)];
        self.store.put(&key, &results)?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_registry_ids_are_unique() {
        let registry = Source::registry();
        let mut ids: Vec<_> = registry.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn test_search_url_encodes_query() {
        let ebay = Source::new("ebay", "eBay", Some("https://www.ebay.com/sch/i.html?_nkw={query}"));
        assert_eq!(
            ebay.search_url("brake pad for Honda Civic"),
            "https://www.ebay.com/sch/i.html?_nkw=brake%20pad%20for%20Honda%20Civic"
        );
    }

    #[test]
    fn test_search_url_fallback_template() {
        let source = Source::named("flipkart");
        assert_eq!(
            source.search_url("brake pad"),
            "flipkart/search?q=brake%20pad"
        );
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let source = Source::named("ebay");
        let a = SampleProvider::synthesize("brake pad for Honda Civic", &source);
        let b = SampleProvider::synthesize("brake pad for Honda Civic", &source);
        assert_eq!(a, b);

        assert_eq!(a.name, "brake pad for Honda Civic - Sample from ebay");
        assert!((1500.0..2000.0).contains(&a.price));
        assert!((4.0..4.1).contains(&a.rating));
    }

    #[test]
    fn test_synthesis_varies_by_source() {
        let a = SampleProvider::synthesize("brake pad", &Source::named("ebay"));
        let b = SampleProvider::synthesize("brake pad", &Source::named("amazon"));
        assert_ne!(a.link, b.link);
        // Hash-derived values land in the same band but rarely coincide.
        assert!(a.price != b.price || a.rating != b.rating);
    }

    #[tokio::test]
    async fn test_fetch_hits_cache_on_second_call() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(CacheStore::new(dir.path()));
        let provider = SampleProvider::new(store.clone());
        let source = Source::named("ebay");

        let first = provider.fetch("brake pad for Honda Civic", &source).await.unwrap();
        let second = provider.fetch("brake pad for Honda Civic", &source).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_returns_cached_value_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(CacheStore::new(dir.path()));
        let source = Source::named("ebay");

        // Pre-seed the cache with a value the synthesizer would never produce.
        let key = CacheKey::derive("brake pad for Honda Civic", "ebay");
        let seeded = vec![SearchResult {
            name: "hand seeded".to_string(),
            price: 10.0,
            rating: 5.0,
            link: "https://example.com".to_string(),
        }];
        store.put(&key, &seeded).unwrap();

        let provider = SampleProvider::new(store);
        let fetched = provider.fetch("brake pad for Honda Civic", &source).await.unwrap();
        assert_eq!(fetched, seeded);
    }
}
