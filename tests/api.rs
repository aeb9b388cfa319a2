use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use dimora::application::repos::ListingsRepo;
use dimora::infra::http::ListingQuery;
use dimora::infra::http::api::handlers;
use dimora::infra::http::api::rate_limit::ApiRateLimiter;
use dimora::infra::http::api::state::ApiState;
use dimora::infra::store::InMemoryListings;

fn build_state() -> ApiState {
    let listings: Arc<dyn ListingsRepo> =
        Arc::new(InMemoryListings::without_delay().expect("valid record set"));
    ApiState {
        listings,
        rate_limiter: Arc::new(ApiRateLimiter::new(Duration::from_secs(60), 200)),
    }
}

fn filter_query(params: &str) -> Query<ListingQuery> {
    let uri: Uri = format!("/api/v1/listings?{params}")
        .parse()
        .expect("valid uri");
    Query::try_from_uri(&uri).expect("query parses")
}

// ============ Listings ============

#[tokio::test]
async fn api_lists_the_full_record_set_without_filters() {
    let state = build_state();

    let response = handlers::list_listings(State(state), Ok(filter_query("")))
        .await
        .expect("list succeeds");

    assert_eq!(response.0.total, 8);
    assert_eq!(response.0.items.len(), 8);
    assert_eq!(response.0.items[0].id, "1");
    assert_eq!(response.0.items[7].id, "8");
}

#[tokio::test]
async fn api_city_filter_is_case_insensitive() {
    let state = build_state();

    let response = handlers::list_listings(State(state.clone()), Ok(filter_query("city=MANCHESTER")))
        .await
        .expect("list succeeds");
    let upper_ids: Vec<&str> = response.0.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(upper_ids, vec!["1", "4", "5"]);

    let response = handlers::list_listings(State(state), Ok(filter_query("city=manchester")))
        .await
        .expect("list succeeds");
    let lower_ids: Vec<&str> = response.0.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(lower_ids, upper_ids);
}

#[tokio::test]
async fn api_combined_filters_all_apply() {
    let state = build_state();

    let response = handlers::list_listings(
        State(state),
        Ok(filter_query("city=manchester&min_bedrooms=2")),
    )
    .await
    .expect("list succeeds");

    let ids: Vec<&str> = response.0.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "5"]);
}

#[tokio::test]
async fn api_max_price_filter_returns_the_cheap_records() {
    let state = build_state();

    let response = handlers::list_listings(State(state), Ok(filter_query("max_price=700")))
        .await
        .expect("list succeeds");

    let ids: Vec<&str> = response.0.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "7"]);
    assert_eq!(response.0.items[0].price, 650);
    assert_eq!(response.0.items[1].price, 550);
}

#[tokio::test]
async fn api_empty_result_is_an_ordinary_response() {
    let state = build_state();

    let response = handlers::list_listings(State(state), Ok(filter_query("max_price=100")))
        .await
        .expect("list succeeds");

    assert_eq!(response.0.total, 0);
    assert!(response.0.items.is_empty());
}

// ============ Single record ============

#[tokio::test]
async fn api_returns_one_listing_by_id() {
    let state = build_state();

    let response = handlers::get_listing(State(state), Path("1".to_string()))
        .await
        .expect("lookup succeeds");

    assert_eq!(response.0.id, "1");
    assert_eq!(response.0.city, "Manchester");
    assert_eq!(response.0.bedrooms, 2);
    assert_eq!(response.0.price, 1100);
    assert_eq!(response.0.available_from, "2026-09-01");
}

#[tokio::test]
async fn api_absent_id_yields_404_json_error() {
    let state = build_state();

    let error = handlers::get_listing(State(state), Path("does-not-exist".to_string()))
        .await
        .expect_err("missing id is an error response");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).expect("json error body");
    assert_eq!(value["error"]["code"], "not_found");
}

// ============ Stats ============

#[tokio::test]
async fn api_stats_summarise_the_record_set() {
    let state = build_state();

    let response = handlers::get_stats(State(state))
        .await
        .expect("stats succeed");

    assert_eq!(response.0.total_count, 8);
    assert_eq!(
        response.0.distinct_cities,
        vec!["Manchester", "Leeds", "Liverpool", "Sheffield", "York"]
    );
    assert_eq!(response.0.average_price, 987);
    assert_eq!(response.0.min_price, 550);
    assert_eq!(response.0.max_price, 1600);
    assert!(response.0.min_price <= response.0.average_price);
    assert!(response.0.average_price <= response.0.max_price);
}

#[tokio::test]
async fn api_stats_total_matches_the_unfiltered_list() {
    let state = build_state();

    let stats = handlers::get_stats(State(state.clone()))
        .await
        .expect("stats succeed");
    let listings = handlers::list_listings(State(state), Ok(filter_query("")))
        .await
        .expect("list succeeds");

    assert_eq!(stats.0.total_count, listings.0.total);
}
