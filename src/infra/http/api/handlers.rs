use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::application::repos::RepoError;
use crate::infra::http::ListingQuery;

use super::error::ApiError;
use super::models::{ListingListResponse, ListingResponse, StatsResponse};
use super::state::ApiState;

/// `GET /api/v1/listings` — filtered list, filters as query parameters.
pub async fn list_listings(
    State(state): State<ApiState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<ListingListResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::bad_request("Invalid filter value", Some(rejection.to_string()))
    })?;

    let filter = query.into_filter();
    let records = state
        .listings
        .list_listings(&filter)
        .await
        .map_err(repo_error)?;

    let items: Vec<ListingResponse> = records.iter().map(ListingResponse::from).collect();
    let total = items.len();
    Ok(Json(ListingListResponse { items, total }))
}

/// `GET /api/v1/listings/{id}` — one record, 404 on absence.
pub async fn get_listing(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let record = state
        .listings
        .find_by_id(&id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    Ok(Json(ListingResponse::from(&record)))
}

/// `GET /api/v1/stats` — aggregate view, recomputed per call.
pub async fn get_stats(State(state): State<ApiState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.listings.load_stats().await.map_err(repo_error)?;
    Ok(Json(StatsResponse::from(&stats)))
}

fn repo_error(err: RepoError) -> ApiError {
    ApiError::repo(err.to_string())
}
