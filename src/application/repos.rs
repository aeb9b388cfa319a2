//! Repository traits describing the listing data source.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::listings::{Listing, ListingFilter, StatsSummary};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Read-only access to the listing record set.
///
/// Absence of a record is expressed as `Ok(None)`, never as an error, so
/// callers can render a not-found state distinct from a failure state.
#[async_trait]
pub trait ListingsRepo: Send + Sync {
    /// Return the records satisfying every supplied constraint, preserving
    /// record-set order.
    async fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RepoError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Listing>, RepoError>;

    /// Every record's id, in record-set order.
    async fn list_ids(&self) -> Result<Vec<String>, RepoError>;

    /// Aggregate view, recomputed from the record set on every call.
    async fn load_stats(&self) -> Result<StatsSummary, RepoError>;
}
