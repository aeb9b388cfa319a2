//! Catalog service: turns the listing record set into page view models and
//! schema.org structured data for the public site.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tracing::warn;

use crate::application::error::HttpError;
use crate::application::repos::{ListingsRepo, RepoError};
use crate::config::SiteSettings;
use crate::domain::listings::{
    Listing, ListingFilter, StatsSummary, format_human_date, format_iso_date,
};
use crate::presentation::views::{
    FilterFormView, LandingContext, ListingCard, ListingDetailContext, ListingsContext, StatsView,
    format_price, rooms_label,
};

const SOURCE: &str = "application::catalog::CatalogService";
const CARD_SUMMARY_LEN: usize = 160;

#[derive(Clone)]
pub struct CatalogService {
    listings: Arc<dyn ListingsRepo>,
    site: Arc<SiteSettings>,
}

impl CatalogService {
    pub fn new(listings: Arc<dyn ListingsRepo>, site: Arc<SiteSettings>) -> Self {
        Self { listings, site }
    }

    pub fn featured_ids(&self) -> &[String] {
        &self.site.featured_ids
    }

    /// Landing page content: aggregate stats plus the featured listings.
    pub async fn landing_context(&self) -> Result<LandingContext, HttpError> {
        let stats = self
            .listings
            .load_stats()
            .await
            .map_err(|err| repo_failure("load_stats", err))?;

        let mut featured = Vec::with_capacity(self.site.featured_ids.len());
        for id in &self.site.featured_ids {
            let record = self
                .listings
                .find_by_id(id)
                .await
                .map_err(|err| repo_failure("find_by_id", err))?;
            match record {
                Some(record) => featured.push(record_to_card(&record)),
                None => warn!(
                    target = "dimora::catalog",
                    id = %id,
                    "featured id does not match any listing"
                ),
            }
        }

        let listings_ld_json = build_listings_ld_json(
            &featured,
            "/",
            &self.site.public_site_url,
            &self.site.meta_title,
        );

        Ok(LandingContext {
            stats: stats_view(&stats),
            featured,
            listings_ld_json,
        })
    }

    /// Filtered listings page content. An empty result set renders as an
    /// ordinary page, never as an error.
    pub async fn listings_context(
        &self,
        filter: &ListingFilter,
    ) -> Result<ListingsContext, HttpError> {
        let records = self
            .listings
            .list_listings(filter)
            .await
            .map_err(|err| repo_failure("list_listings", err))?;
        let stats = self
            .listings
            .load_stats()
            .await
            .map_err(|err| repo_failure("load_stats", err))?;

        let cards: Vec<ListingCard> = records.iter().map(record_to_card).collect();
        let listings_ld_json = build_listings_ld_json(
            &cards,
            "/listings",
            &self.site.public_site_url,
            &self.site.meta_title,
        );

        let listing_count = cards.len();
        Ok(ListingsContext {
            listings: cards,
            listing_count,
            total_count: stats.total_count,
            has_results: listing_count > 0,
            filter_label: describe_filter(filter),
            form: filter_form(filter),
            listings_ld_json,
        })
    }

    /// Detail page content for one listing, or `None` when the id does not
    /// match any record.
    pub async fn listing_detail(
        &self,
        id: &str,
    ) -> Result<Option<ListingDetailContext>, HttpError> {
        let record = self
            .listings
            .find_by_id(id)
            .await
            .map_err(|err| repo_failure("find_by_id", err))?;

        let Some(record) = record else {
            return Ok(None);
        };

        let ld_json = build_listing_ld_json(&record, &self.site.public_site_url);

        Ok(Some(ListingDetailContext {
            id: record.id.to_string(),
            title: record.title.to_string(),
            description: record.description.to_string(),
            address: record.address.to_string(),
            city: record.city.to_string(),
            price_label: format_price(record.price),
            rooms_label: rooms_label(record.bedrooms, record.bathrooms),
            available_label: format!("Available from {}", format_human_date(record.available_from)),
            features: record.features.iter().map(|f| f.to_string()).collect(),
            image_url: record.image_url.to_string(),
            ld_json,
        }))
    }
}

fn repo_failure(operation: &'static str, err: RepoError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to load listings",
        format!("{operation} failed: {err}"),
    )
}

fn record_to_card(record: &Listing) -> ListingCard {
    ListingCard {
        id: record.id.to_string(),
        path: format!("/listings/{}", record.id),
        title: record.title.to_string(),
        city: record.city.to_string(),
        address: record.address.to_string(),
        price_label: format_price(record.price),
        rooms_label: rooms_label(record.bedrooms, record.bathrooms),
        available_label: format!("Available from {}", format_human_date(record.available_from)),
        summary: summarize(record.description, CARD_SUMMARY_LEN),
        features: record.features.iter().map(|f| f.to_string()).collect(),
        image_url: record.image_url.to_string(),
    }
}

fn stats_view(stats: &StatsSummary) -> StatsView {
    StatsView {
        total_count: stats.total_count,
        distinct_cities: stats
            .distinct_cities
            .iter()
            .map(|city| city.to_string())
            .collect(),
        average_price_label: format_price(stats.average_price),
        min_price_label: format_price(stats.min_price),
        max_price_label: format_price(stats.max_price),
    }
}

fn filter_form(filter: &ListingFilter) -> FilterFormView {
    FilterFormView {
        city: filter.city.clone().unwrap_or_default(),
        min_bedrooms: filter
            .min_bedrooms
            .map(|value| value.to_string())
            .unwrap_or_default(),
        min_bathrooms: filter
            .min_bathrooms
            .map(|value| value.to_string())
            .unwrap_or_default(),
        max_price: filter
            .max_price
            .map(|value| value.to_string())
            .unwrap_or_default(),
    }
}

fn describe_filter(filter: &ListingFilter) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(city) = filter.city.as_deref() {
        parts.push(format!("in {city}"));
    }
    if let Some(min) = filter.min_bedrooms {
        parts.push(format!("{min}+ bedrooms"));
    }
    if let Some(min) = filter.min_bathrooms {
        parts.push(format!("{min}+ bathrooms"));
    }
    if let Some(max) = filter.max_price {
        parts.push(format!("up to {}", format_price(max)));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn summarize(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncated = text[..cut].trim_end_matches(|ch: char| !ch.is_whitespace());
    format!("{}…", truncated.trim_end())
}

fn build_listings_ld_json(
    cards: &[ListingCard],
    page_path: &str,
    public_site_url: &str,
    site_name: &str,
) -> Option<String> {
    if cards.is_empty() {
        return None;
    }

    let site_url = normalize_public_site_url(public_site_url);
    let page_url = canonical_for(&site_url, page_path);

    let items = cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": card.title,
                "url": format!("{site_url}listings/{}", card.id),
            })
        })
        .collect::<Vec<_>>();

    serde_json::to_string(&json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "name": site_name,
        "url": page_url,
        "itemListElement": items,
    }))
    .ok()
}

fn build_listing_ld_json(record: &Listing, public_site_url: &str) -> Option<String> {
    let site_url = normalize_public_site_url(public_site_url);

    serde_json::to_string(&json!({
        "@context": "https://schema.org",
        "@type": "Apartment",
        "name": record.title,
        "description": record.description,
        "url": format!("{site_url}listings/{}", record.id),
        "numberOfRooms": record.bedrooms,
        "address": {
            "@type": "PostalAddress",
            "streetAddress": record.address,
            "addressLocality": record.city,
            "addressCountry": "GB",
        },
        "offers": {
            "@type": "Offer",
            "price": record.price,
            "priceCurrency": "GBP",
            "availabilityStarts": format_iso_date(record.available_from),
        },
    }))
    .ok()
}

fn canonical_for(normalized_site_url: &str, path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        normalized_site_url.trim_end_matches('/').to_string()
    } else {
        format!("{normalized_site_url}{trimmed}")
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}
