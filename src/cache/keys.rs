//! Page cache key definitions.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Identifies one cached rendered page: a request path plus the hash of its
/// query string, so differently-filtered list pages cache independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub path: String,
    pub query_hash: u64,
}

impl PageKey {
    pub fn new(path: impl Into<String>, query: &str) -> Self {
        Self {
            path: path.into(),
            query_hash: hash_query(query),
        }
    }
}

/// Freshness classes with distinct revalidation windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// A single listing's detail page.
    ListingDetail,
    /// Landing page, listings index, sitemap.
    Index,
}

/// Classify a request path into its freshness class.
pub fn classify(path: &str) -> TtlClass {
    let remainder = path.strip_prefix("/listings/").unwrap_or("");
    if !remainder.is_empty() && !remainder.contains('/') {
        TtlClass::ListingDetail
    } else {
        TtlClass::Index
    }
}

/// Compute a hash for any hashable value.
pub fn hash_value<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash a query string for page cache key generation.
pub fn hash_query(query: &str) -> u64 {
    hash_value(&query)
}
