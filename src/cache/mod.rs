//! Dimora page cache.
//!
//! One store, three generation strategies:
//!
//! - **Eager**: the warmer renders the landing page and featured detail pages
//!   into the store at startup.
//! - **On demand**: the middleware stores any successful GET response it had
//!   to render.
//! - **Timed revalidation**: entries carry a freshness deadline; an expired
//!   entry is re-rendered and replaced on the next request.
//!
//! Cache behavior is controlled via `dimora.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! response_limit = 200
//! listing_ttl_seconds = 300
//! index_ttl_seconds = 60
//! ```

mod config;
mod keys;
mod lock;
mod middleware;
mod store;
mod warmer;

pub use config::CacheConfig;
pub use keys::{PageKey, TtlClass, classify, hash_query, hash_value};
pub use middleware::{CacheState, page_cache_layer};
pub use store::{CachedPage, Freshness, ResponseStore, should_store_response};
pub use warmer::{CacheWarmError, CacheWarmer};
