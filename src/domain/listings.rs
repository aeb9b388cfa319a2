//! The listing record set and its pure query functions.
//!
//! The record set is fixed at compile time and never mutated; every operation
//! here is a synchronous function of the records and its arguments. Simulated
//! latency and caching live in outer layers.

mod data;

use serde::Serialize;
use time::{Date, format_description::FormatItem, macros::format_description};

use crate::domain::error::DomainError;

pub use data::LISTINGS;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none] [month repr:long] [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// A rental property record. `bedrooms == 0` denotes a studio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub bedrooms: u8,
    pub bathrooms: u8,
    /// Monthly rent in whole pounds.
    pub price: u32,
    pub features: &'static [&'static str],
    pub available_from: Date,
    pub image_url: &'static str,
}

/// Optional predicates narrowing a listing query. An absent field imposes no
/// constraint; an empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Case-insensitive exact match against the record's city.
    pub city: Option<String>,
    pub min_bedrooms: Option<u8>,
    pub min_bathrooms: Option<u8>,
    pub max_price: Option<u32>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.min_bedrooms.is_none()
            && self.min_bathrooms.is_none()
            && self.max_price.is_none()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(city) = self.city.as_deref() {
            if !listing.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if let Some(min) = self.min_bedrooms {
            if listing.bedrooms < min {
                return false;
            }
        }
        if let Some(min) = self.min_bathrooms {
            if listing.bathrooms < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if listing.price > max {
                return false;
            }
        }
        true
    }
}

/// Aggregate view over the record set, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_count: usize,
    /// City names in first-occurrence order, no duplicates.
    pub distinct_cities: Vec<&'static str>,
    /// Mean monthly rent, rounded half up to the nearest whole pound.
    pub average_price: u32,
    pub min_price: u32,
    pub max_price: u32,
}

pub fn all() -> &'static [Listing] {
    &LISTINGS
}

/// Stable filter over the record set: matching records keep their original
/// relative order. An empty result is an ordinary outcome, not an error.
pub fn collect(filter: &ListingFilter) -> Vec<&'static Listing> {
    LISTINGS
        .iter()
        .filter(|listing| filter.matches(listing))
        .collect()
}

pub fn find_by_id(id: &str) -> Option<&'static Listing> {
    LISTINGS.iter().find(|listing| listing.id == id)
}

pub fn all_ids() -> Vec<&'static str> {
    LISTINGS.iter().map(|listing| listing.id).collect()
}

pub fn compute_stats() -> StatsSummary {
    let mut distinct_cities: Vec<&'static str> = Vec::new();
    let mut sum: u64 = 0;
    let mut min_price = u32::MAX;
    let mut max_price = 0u32;

    for listing in LISTINGS.iter() {
        if !distinct_cities
            .iter()
            .any(|city| city.eq_ignore_ascii_case(listing.city))
        {
            distinct_cities.push(listing.city);
        }
        sum += u64::from(listing.price);
        min_price = min_price.min(listing.price);
        max_price = max_price.max(listing.price);
    }

    let count = LISTINGS.len();
    let average_price = if count == 0 {
        0
    } else {
        u32::try_from((sum + count as u64 / 2) / count as u64).unwrap_or(u32::MAX)
    };

    StatsSummary {
        total_count: count,
        distinct_cities,
        average_price,
        min_price: if count == 0 { 0 } else { min_price },
        max_price,
    }
}

/// Check the record-set invariants: unique ids, at least one bathroom, and a
/// positive price on every record.
pub fn validate(records: &[Listing]) -> Result<(), DomainError> {
    for (index, listing) in records.iter().enumerate() {
        if listing.id.is_empty() {
            return Err(DomainError::invariant(format!(
                "listing at index {index} has an empty id"
            )));
        }
        if records[..index].iter().any(|other| other.id == listing.id) {
            return Err(DomainError::invariant(format!(
                "duplicate listing id `{}`",
                listing.id
            )));
        }
        if listing.bathrooms == 0 {
            return Err(DomainError::invariant(format!(
                "listing `{}` has no bathroom",
                listing.id
            )));
        }
        if listing.price == 0 {
            return Err(DomainError::invariant(format!(
                "listing `{}` has a zero price",
                listing.id
            )));
        }
    }
    Ok(())
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT).expect("valid calendar date")
}

pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT).expect("valid calendar date")
}
