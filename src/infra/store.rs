//! In-memory listing store.
//!
//! Serves the fixed record set behind the `ListingsRepo` boundary so the
//! HTTP layer stays oblivious to where records come from. The record set is
//! validated once at construction and never mutated afterwards, so the store
//! is freely shareable across concurrent requests.

use async_trait::async_trait;

use crate::application::repos::{ListingsRepo, RepoError};
use crate::domain::error::DomainError;
use crate::domain::listings::{self, Listing, ListingFilter, StatsSummary};
use crate::infra::latency::{DelayPolicy, OpClass};

pub struct InMemoryListings {
    delay: DelayPolicy,
}

impl InMemoryListings {
    pub fn new(delay: DelayPolicy) -> Result<Self, DomainError> {
        listings::validate(listings::all())?;
        Ok(Self { delay })
    }

    pub fn without_delay() -> Result<Self, DomainError> {
        Self::new(DelayPolicy::Disabled)
    }
}

#[async_trait]
impl ListingsRepo for InMemoryListings {
    async fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RepoError> {
        self.delay.apply(OpClass::List).await;
        Ok(listings::collect(filter).into_iter().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Listing>, RepoError> {
        self.delay.apply(OpClass::Detail).await;
        Ok(listings::find_by_id(id).cloned())
    }

    async fn list_ids(&self) -> Result<Vec<String>, RepoError> {
        self.delay.apply(OpClass::Summary).await;
        Ok(listings::all_ids()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    async fn load_stats(&self) -> Result<StatsSummary, RepoError> {
        self.delay.apply(OpClass::Summary).await;
        Ok(listings::compute_stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryListings {
        InMemoryListings::without_delay().expect("valid record set")
    }

    #[tokio::test]
    async fn list_with_no_filter_returns_the_full_set() {
        let records = store()
            .list_listings(&ListingFilter::default())
            .await
            .expect("list succeeds");
        assert_eq!(records.len(), listings::all().len());
    }

    #[tokio::test]
    async fn absent_id_is_ok_none_not_an_error() {
        let result = store().find_by_id("does-not-exist").await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn ids_round_trip_through_find_by_id() {
        let store = store();
        let ids = store.list_ids().await.expect("ids listed");
        for id in ids {
            let found = store.find_by_id(&id).await.expect("lookup succeeds");
            assert_eq!(found.expect("record present").id, id);
        }
    }

    #[tokio::test]
    async fn stats_total_matches_unfiltered_list() {
        let store = store();
        let stats = store.load_stats().await.expect("stats computed");
        let all = store
            .list_listings(&ListingFilter::default())
            .await
            .expect("list succeeds");
        assert_eq!(stats.total_count, all.len());
    }
}
