//! Part Finder - natural-language automobile part search
//!
//! This library implements a small deterministic pipeline:
//! - Query extraction via a local language model (with safe fallback)
//! - Fan-out over a fixed registry of part sources
//! - Content-addressed file cache per (query, source) pair
//! - Weighted ranking to pick the single best candidate
//! - CSV/JSON export of the result set

pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod llm;
pub mod logging;
pub mod query;
pub mod rank;
pub mod source;

// Re-export main types for convenience
pub use crate::cache::{CacheKey, CacheStore};
pub use crate::config::AppConfig;
pub use crate::core::{PartFinder, SearchReport};
pub use crate::error::{PartFinderError, PartFinderResult};
pub use crate::query::{ParsedQuery, QueryOutcome};
pub use crate::rank::RankedResult;
pub use crate::source::{ResultProvider, SampleProvider, SearchResult, Source};
