use serde::{Deserialize, Serialize};

use crate::domain::listings::{Listing, StatsSummary, format_iso_date};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub price: u32,
    pub features: Vec<String>,
    /// ISO 8601 calendar date.
    pub available_from: String,
    pub image_url: String,
}

impl From<&Listing> for ListingResponse {
    fn from(record: &Listing) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.to_string(),
            description: record.description.to_string(),
            address: record.address.to_string(),
            city: record.city.to_string(),
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            price: record.price,
            features: record.features.iter().map(|f| f.to_string()).collect(),
            available_from: format_iso_date(record.available_from),
            image_url: record.image_url.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingListResponse {
    pub items: Vec<ListingResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_count: usize,
    pub distinct_cities: Vec<String>,
    pub average_price: u32,
    pub min_price: u32,
    pub max_price: u32,
}

impl From<&StatsSummary> for StatsResponse {
    fn from(stats: &StatsSummary) -> Self {
        Self {
            total_count: stats.total_count,
            distinct_cities: stats
                .distinct_cities
                .iter()
                .map(|city| city.to_string())
                .collect(),
            average_price: stats.average_price,
            min_price: stats.min_price,
            max_price: stats.max_price,
        }
    }
}
