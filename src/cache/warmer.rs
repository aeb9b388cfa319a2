//! Startup cache warmup: eager page generation.
//!
//! Renders the landing page and the featured listing detail pages into the
//! page cache before the listener accepts traffic, so the first visitor of
//! each is served a pre-generated response.

use axum::response::Response;
use thiserror::Error;
use tracing::{info, warn};

use crate::infra::http::{HttpState, public};

use super::keys::{PageKey, classify};
use super::middleware::CacheState;
use super::store::{CacheStoreError, should_store_response};

#[derive(Debug, Error)]
pub enum CacheWarmError {
    #[error("failed to store warmed response for `{path}`: {source}")]
    Cache {
        path: String,
        #[source]
        source: CacheStoreError,
    },
}

pub struct CacheWarmer {
    state: HttpState,
}

impl CacheWarmer {
    pub fn new(state: HttpState) -> Self {
        Self { state }
    }

    pub async fn warm_initial(&self) -> Result<(), CacheWarmError> {
        let Some(cache) = self.state.cache.clone() else {
            return Ok(());
        };

        info!(target = "dimora::cache_warmer", "warming page cache");

        let response = public::index_response(&self.state).await;
        self.store(&cache, "/", response).await?;

        let featured: Vec<String> = self.state.catalog.featured_ids().to_vec();
        for id in featured {
            let path = format!("/listings/{id}");
            let response = public::listing_response(&self.state, &id).await;
            self.store(&cache, &path, response).await?;
        }

        Ok(())
    }

    async fn store(
        &self,
        cache: &CacheState,
        path: &str,
        response: Response,
    ) -> Result<(), CacheWarmError> {
        if !should_store_response(&response) {
            warn!(
                target = "dimora::cache_warmer",
                path = %path,
                status = response.status().as_u16(),
                "skipping warmup entry that did not render OK"
            );
            return Ok(());
        }

        let ttl = cache.config.ttl_for(classify(path));
        match cache
            .store
            .store_response(PageKey::new(path, ""), ttl, response)
            .await
        {
            Ok(_) => {
                info!(
                    target = "dimora::cache_warmer",
                    path = %path,
                    "cache entry warmed"
                );
                Ok(())
            }
            Err((_, source)) => Err(CacheWarmError::Cache {
                path: path.to_string(),
                source,
            }),
        }
    }
}
