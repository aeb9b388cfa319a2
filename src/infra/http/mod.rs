pub mod api;
mod middleware;
pub mod public;

pub use api::rate_limit::ApiRateLimiter;
pub use api::{ApiState, build_api_router as build_api_v1_router};
pub use public::{HttpState, build_router};

use std::fmt::Display;
use std::str::FromStr;

use axum::extract::FromRef;
use serde::{Deserialize, Deserializer};

use crate::domain::listings::ListingFilter;

#[derive(Clone)]
pub struct RouterState {
    pub http: HttpState,
    pub api: ApiState,
}

impl FromRef<RouterState> for HttpState {
    fn from_ref(state: &RouterState) -> Self {
        state.http.clone()
    }
}

impl FromRef<RouterState> for ApiState {
    fn from_ref(state: &RouterState) -> Self {
        state.api.clone()
    }
}

/// Query-string filter parameters shared by the HTML and JSON surfaces.
///
/// Parsing is strict: an empty value means the field is absent, while a
/// non-numeric value for a numeric filter rejects the whole request with 400
/// before it reaches the listing store.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    #[serde(deserialize_with = "empty_string_as_none")]
    pub city: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub min_bedrooms: Option<u8>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub min_bathrooms: Option<u8>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub max_price: Option<u32>,
}

impl ListingQuery {
    pub fn into_filter(self) -> ListingFilter {
        ListingFilter {
            city: self.city,
            min_bedrooms: self.min_bedrooms,
            min_bathrooms: self.min_bathrooms,
            max_price: self.max_price,
        }
    }
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::*;

    fn parse(query: &str) -> Result<ListingQuery, String> {
        let uri: Uri = format!("/listings?{query}").parse().expect("valid uri");
        Query::<ListingQuery>::try_from_uri(&uri)
            .map(|Query(value)| value)
            .map_err(|err| err.to_string())
    }

    #[test]
    fn absent_and_empty_fields_impose_no_constraint() {
        let filter = parse("").expect("empty query parses").into_filter();
        assert!(filter.is_empty());

        let filter = parse("city=&min_bedrooms=&max_price=")
            .expect("empty values parse")
            .into_filter();
        assert!(filter.is_empty());
    }

    #[test]
    fn numeric_fields_parse_into_the_filter() {
        let filter = parse("city=manchester&min_bedrooms=2&max_price=1200")
            .expect("valid query parses")
            .into_filter();
        assert_eq!(filter.city.as_deref(), Some("manchester"));
        assert_eq!(filter.min_bedrooms, Some(2));
        assert_eq!(filter.min_bathrooms, None);
        assert_eq!(filter.max_price, Some(1200));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert!(parse("min_bedrooms=two").is_err());
        assert!(parse("max_price=cheap").is_err());
    }
}
