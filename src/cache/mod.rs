use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PartFinderError, PartFinderResult};
use crate::source::SearchResult;

/// Deterministic cache key for a (query, source) pair.
///
/// Derived as the hex SHA-256 digest of the concatenated identifiers, so
/// the same pair always maps to the same backing file. Collisions are
/// treated as hits; no collision detection is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(query: &str, source_id: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(query.as_bytes());
        hasher.update(source_id.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// File-backed store mapping a cache key to a previously fetched result list.
///
/// One JSON file per key, named by the hex digest, holding the serialized
/// `SearchResult` array. Entries are never invalidated or expired; the
/// backing directory is injected so each test can use its own.
pub struct CacheStore {
    directory: PathBuf,
}

impl CacheStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }

    /// Get the stored result list for a key.
    ///
    /// An absent file is a miss. An unreadable or unparseable file is also
    /// treated as a miss (logged) so the caller re-synthesizes and
    /// overwrites, keeping the pipeline non-fatal on corrupt entries.
    pub fn get(&self, key: &CacheKey) -> PartFinderResult<Option<Vec<SearchResult>>> {
        let path = self.entry_path(key);

        if !path.exists() {
            debug!("Cache miss for key: {}", key);
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read cache entry {}: {}", key, e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<Vec<SearchResult>>(&content) {
            Ok(results) => {
                debug!("Cache hit for key: {} ({} results)", key, results.len());
                Ok(Some(results))
            }
            Err(e) => {
                warn!("Corrupt cache entry {}, treating as miss: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Persist a result list under a key, overwriting unconditionally.
    pub fn put(&self, key: &CacheKey, results: &[SearchResult]) -> PartFinderResult<()> {
        std::fs::create_dir_all(&self.directory)?;

        let path = self.entry_path(key);
        let content = serde_json::to_string(results)
            .map_err(|e| PartFinderError::cache(e.to_string()))?;
        std::fs::write(&path, content)?;

        debug!("Cached {} results under key: {}", results.len(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_result(name: &str) -> SearchResult {
        SearchResult {
            name: name.to_string(),
            price: 1750.0,
            rating: 4.05,
            link: "https://www.ebay.com/sch/i.html?_nkw=brake+pad".to_string(),
        }
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        let a = CacheKey::derive("brake pad for Honda Civic", "ebay");
        let b = CacheKey::derive("brake pad for Honda Civic", "ebay");
        assert_eq!(a, b);

        let c = CacheKey::derive("brake pad for Honda Civic", "amazon");
        assert_ne!(a, c);
    }

    #[test]
    fn test_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let key = CacheKey::derive("brake pad for Honda Civic", "ebay");

        let results = vec![sample_result("brake pad for Honda Civic - Sample from ebay")];
        store.put(&key, &results).unwrap();

        let fetched = store.get(&key).unwrap().unwrap();
        assert_eq!(fetched, results);
    }

    #[test]
    fn test_missing_entry_is_none() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let key = CacheKey::derive("wiper blade for Toyota Corolla", "amazon");

        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_treated_as_miss() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let key = CacheKey::derive("brake pad for Honda Civic", "ebay");

        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join(format!("{}.json", key)), "{not valid json").unwrap();

        assert!(store.get(&key).unwrap().is_none());

        // A fresh put overwrites the corrupt file.
        let results = vec![sample_result("replacement")];
        store.put(&key, &results).unwrap();
        assert_eq!(store.get(&key).unwrap().unwrap(), results);
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let key = CacheKey::derive("brake pad for Honda Civic", "ebay");

        store.put(&key, &[sample_result("first")]).unwrap();
        store.put(&key, &[sample_result("second")]).unwrap();

        let fetched = store.get(&key).unwrap().unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].name, "second");
    }

    #[test]
    fn test_entries_are_isolated_per_key() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());

        let key_a = CacheKey::derive("brake pad for Honda Civic", "ebay");
        let key_b = CacheKey::derive("brake pad for Honda Civic", "amazon");

        store.put(&key_a, &[sample_result("ebay entry")]).unwrap();
        store.put(&key_b, &[sample_result("amazon entry")]).unwrap();

        assert_eq!(store.get(&key_a).unwrap().unwrap()[0].name, "ebay entry");
        assert_eq!(store.get(&key_b).unwrap().unwrap()[0].name, "amazon entry");
    }
}
