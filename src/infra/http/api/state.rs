use std::sync::Arc;

use crate::application::repos::ListingsRepo;

use super::rate_limit::ApiRateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub listings: Arc<dyn ListingsRepo>,
    pub rate_limiter: Arc<ApiRateLimiter>,
}
