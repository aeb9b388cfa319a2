//! Page cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use super::keys::TtlClass;

const DEFAULT_RESPONSE_LIMIT: usize = 200;
const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(300);
const DEFAULT_INDEX_TTL: Duration = Duration::from_secs(60);

/// Page cache configuration, resolved from `dimora.toml`.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Enable the rendered-page cache.
    pub enabled: bool,
    /// Maximum buffered responses held at once.
    pub response_limit: usize,
    /// Freshness window for listing detail pages.
    pub listing_ttl: Duration,
    /// Freshness window for the landing page, listings index and sitemap.
    pub index_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            response_limit: DEFAULT_RESPONSE_LIMIT,
            listing_ttl: DEFAULT_LISTING_TTL,
            index_ttl: DEFAULT_INDEX_TTL,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            response_limit: settings.response_limit,
            listing_ttl: settings.listing_ttl,
            index_ttl: settings.index_ttl,
        }
    }
}

impl CacheConfig {
    /// Returns the response limit as NonZeroUsize, clamping to 1 if zero.
    pub fn response_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.response_limit).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn ttl_for(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::ListingDetail => self.listing_ttl,
            TtlClass::Index => self.index_ttl,
        }
    }
}
