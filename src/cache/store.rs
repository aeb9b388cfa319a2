//! Rendered-page cache storage.
//!
//! Holds whole buffered responses keyed by path and query hash, each with a
//! freshness deadline. Expired entries stay resident until replaced, so a
//! request that finds one re-renders and overwrites it in place.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use lru::LruCache;
use thiserror::Error;

use super::config::CacheConfig;
use super::keys::PageKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";
const MAX_BUFFERED_BODY_BYTES: usize = 1024 * 1024;

/// A buffered rendered page.
#[derive(Clone)]
pub struct CachedPage {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub expires_at: Instant,
}

impl CachedPage {
    pub fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Expired,
}

#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("failed to buffer response body: {0}")]
    Buffer(String),
}

/// Rendered-page cache with LRU eviction.
pub struct ResponseStore {
    pages: RwLock<LruCache<PageKey, CachedPage>>,
}

impl ResponseStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            pages: RwLock::new(LruCache::new(config.response_limit_non_zero())),
        }
    }

    pub fn get(&self, key: &PageKey) -> Option<(CachedPage, Freshness)> {
        rw_write(&self.pages, SOURCE, "get").get(key).map(|page| {
            let freshness = if page.is_fresh() {
                Freshness::Fresh
            } else {
                Freshness::Expired
            };
            (page.clone(), freshness)
        })
    }

    /// Insert a page, returning the key evicted to make room, if any.
    /// Replacing an existing key is not an eviction.
    pub fn insert(&self, key: PageKey, page: CachedPage) -> Option<PageKey> {
        rw_write(&self.pages, SOURCE, "insert")
            .push(key.clone(), page)
            .map(|(evicted_key, _)| evicted_key)
            .filter(|evicted_key| *evicted_key != key)
    }

    /// Buffer a rendered response into the store under `key` with the given
    /// freshness window, handing back an equivalent response for the caller.
    pub async fn store_response(
        &self,
        key: PageKey,
        ttl: Duration,
        response: Response,
    ) -> Result<(Response, Option<PageKey>), (Response, CacheStoreError)> {
        let (parts, body) = response.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(err) => {
                let rebuilt = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                return Err((rebuilt, CacheStoreError::Buffer(err.to_string())));
            }
        };

        let page = CachedPage {
            status: parts.status.as_u16(),
            headers: parts
                .headers
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.to_string(), value.to_string()))
                })
                .collect(),
            body: bytes.clone(),
            expires_at: Instant::now() + ttl,
        };

        let evicted = self.insert(key, page);
        let rebuilt = Response::from_parts(parts, Body::from(bytes));
        Ok((rebuilt, evicted))
    }

    pub fn invalidate_all(&self) {
        rw_write(&self.pages, SOURCE, "invalidate_all").clear();
    }

    pub fn len(&self) -> usize {
        rw_read(&self.pages, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rebuild an HTTP response from a cached page.
pub fn build_response(page: CachedPage) -> Response {
    use axum::http::HeaderValue;

    let mut builder = Response::builder().status(page.status);
    for (name, value) in page.headers {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            builder = builder.header(name, header_value);
        }
    }

    builder
        .body(Body::from(page.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Whether a rendered response is eligible for caching.
pub fn should_store_response(response: &Response) -> bool {
    response.status() == StatusCode::OK
}
