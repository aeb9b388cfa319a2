//! Page cache middleware.
//!
//! Implements the three generation strategies over one store: entries planted
//! by the warmer at startup are eager generation, a miss rendered and stored
//! here is on-demand generation, and an expired entry re-rendered in place is
//! timed revalidation.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::{debug, instrument, warn};

use super::{
    CacheConfig, ResponseStore,
    keys::{PageKey, classify},
    store::{Freshness, build_response, should_store_response},
};

/// Shared cache state for middleware.
#[derive(Clone)]
pub struct CacheState {
    pub config: CacheConfig,
    pub store: Arc<ResponseStore>,
}

/// Middleware caching rendered GET responses with per-route freshness windows.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn page_cache_layer(
    State(cache): State<CacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !cache.config.enabled {
        return next.run(request).await;
    }

    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("");
    let key = PageKey::new(path.clone(), query);

    match cache.store.get(&key) {
        Some((page, Freshness::Fresh)) => {
            counter!("dimora_page_cache_hit_total").increment(1);
            debug!(cache = "page", outcome = "hit", "serving cached response");
            return build_response(page);
        }
        Some((_, Freshness::Expired)) => {
            counter!("dimora_page_cache_stale_total").increment(1);
            debug!(cache = "page", outcome = "stale", "revalidating expired entry");
        }
        None => {
            counter!("dimora_page_cache_miss_total").increment(1);
            debug!(cache = "page", outcome = "miss", "rendering on demand");
        }
    }

    let response = next.run(request).await;

    if !should_store_response(&response) {
        return response;
    }

    let ttl = cache.config.ttl_for(classify(&path));
    match cache.store.store_response(key, ttl, response).await {
        Ok((rebuilt, evicted)) => {
            if evicted.is_some() {
                counter!("dimora_page_cache_evict_total").increment(1);
            }
            rebuilt
        }
        Err((rebuilt, error)) => {
            warn!(
                target = "dimora::cache",
                path = %path,
                error = %error,
                "failed to buffer response for caching"
            );
            rebuilt
        }
    }
}
