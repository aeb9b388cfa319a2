pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::infra::http::RouterState;
use crate::infra::http::middleware::log_responses;

pub fn build_api_router(state: RouterState) -> Router<RouterState> {
    let rate_state = state.clone();

    Router::new()
        .route("/api/v1/listings", get(handlers::list_listings))
        .route("/api/v1/listings/{id}", get(handlers::get_listing))
        .route("/api/v1/stats", get(handlers::get_stats))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            rate_state,
            middleware::api_rate_limit,
        ))
        .layer(axum_middleware::from_fn(log_responses))
}
