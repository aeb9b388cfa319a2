use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::{
        catalog::CatalogService, chrome::ChromeService, error::HttpError, sitemap::SitemapService,
    },
    cache::{CacheState, page_cache_layer},
    presentation::views::{
        IndexTemplate, LayoutChrome, LayoutContext, ListingDetailContext, ListingTemplate,
        ListingsContext, ListingsTemplate, PageMetaView, render_not_found_response,
        render_template_response,
    },
};

use super::{
    ListingQuery, RouterState,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<CatalogService>,
    pub chrome: Arc<ChromeService>,
    pub sitemap: Arc<SitemapService>,
    pub cache: Option<CacheState>,
}

pub fn build_router(state: RouterState) -> Router<RouterState> {
    // Routes served through the page cache (public rendered content)
    let cached_routes = Router::new()
        .route("/", get(index))
        .route("/listings", get(listings_index))
        .route("/listings/{id}", get(listing_detail))
        .route("/sitemap.xml", get(sitemap))
        .fallback(fallback);

    // Apply the page cache layer conditionally
    let cached_routes = if let Some(cache_state) = state.http.cache.clone() {
        cached_routes.layer(middleware::from_fn_with_state(
            cache_state,
            page_cache_layer,
        ))
    } else {
        cached_routes
    };

    // Routes that should NOT be cached (robots directives, health)
    let static_routes = Router::new()
        .route("/robots.txt", get(robots_txt))
        .route("/_health", get(health));

    cached_routes
        .merge(static_routes)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    index_response(&state).await
}

/// Render the landing page. Shared with the cache warmer and `dimora export`.
pub(crate) async fn index_response(state: &HttpState) -> Response {
    let chrome = state.chrome.load();

    match state.catalog.landing_context().await {
        Ok(content) => {
            let canonical = canonical_url(&chrome.meta.canonical, "/");
            let view = LayoutContext::new(chrome.clone().with_canonical(canonical), content);
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => err.into_response(),
    }
}

async fn listings_index(
    State(state): State<HttpState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Response {
    let chrome = state.chrome.load();

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return HttpError::new(
                "infra::http::public::listings_index",
                StatusCode::BAD_REQUEST,
                "Invalid filter value",
                rejection.to_string(),
            )
            .into_response();
        }
    };

    let filter = query.into_filter();
    match state.catalog.listings_context(&filter).await {
        Ok(content) => {
            let canonical_path = match filter.city.as_deref() {
                Some(city) => format!("/listings?city={}", city.to_ascii_lowercase()),
                None => "/listings".to_string(),
            };
            let canonical = canonical_url(&chrome.meta.canonical, &canonical_path);
            let meta = listings_meta(&chrome, &content, canonical);
            let view = LayoutContext::new(chrome.clone().with_meta(meta), content);
            render_template_response(ListingsTemplate { view }, StatusCode::OK)
        }
        Err(err) => err.into_response(),
    }
}

async fn listing_detail(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    listing_response(&state, &id).await
}

/// Render one listing's detail page, or the styled not-found page when the id
/// does not match any record. Shared with the cache warmer and `dimora export`.
pub(crate) async fn listing_response(state: &HttpState, id: &str) -> Response {
    let chrome = state.chrome.load();

    match state.catalog.listing_detail(id).await {
        Ok(Some(content)) => {
            let canonical = canonical_url(&chrome.meta.canonical, &format!("/listings/{id}"));
            let meta = listing_meta(&chrome, &content, canonical);
            let view = LayoutContext::new(chrome.clone().with_meta(meta), content);
            render_template_response(ListingTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => err.into_response(),
    }
}

async fn sitemap(State(state): State<HttpState>) -> Response {
    match state.sitemap.sitemap_xml().await {
        Ok(body) => xml_response(body, "application/xml"),
        Err(err) => HttpError::new(
            "infra::http::public::sitemap",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate sitemap",
            err.to_string(),
        )
        .into_response(),
    }
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    plain_response(state.sitemap.robots_txt())
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome.load())
}

fn listings_meta(
    chrome: &LayoutChrome,
    content: &ListingsContext,
    canonical: String,
) -> PageMetaView {
    let title = match content.filter_label.as_deref() {
        Some(label) => format!("Listings {label}"),
        None => "All Listings".to_string(),
    };

    chrome
        .meta
        .clone()
        .with_canonical(canonical)
        .with_content(title, chrome.meta.description.clone())
}

fn listing_meta(
    chrome: &LayoutChrome,
    content: &ListingDetailContext,
    canonical: String,
) -> PageMetaView {
    let title = format!("{} — {}, {}", content.title, content.address, content.city);
    let description = fallback_description(
        &truncate_description(&content.description, 180),
        &chrome.meta.description,
    );

    chrome
        .meta
        .clone()
        .with_canonical(canonical)
        .with_content(title, description)
}

fn fallback_description(candidate: &str, fallback: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn truncate_description(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text[..cut].trim_end().to_string()
}

pub(crate) fn canonical_url(base: &str, path: &str) -> String {
    let root = normalize_public_site_url(base);
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        root.trim_end_matches('/').to_string()
    } else {
        format!("{root}{trimmed}")
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

fn xml_response(body: String, content_type: &str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn plain_response(body: String) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_urls_join_cleanly() {
        assert_eq!(
            canonical_url("http://localhost:3000/", "/"),
            "http://localhost:3000"
        );
        assert_eq!(
            canonical_url("http://localhost:3000", "/listings/3"),
            "http://localhost:3000/listings/3"
        );
    }

    #[test]
    fn description_truncation_keeps_char_boundaries() {
        let text = "é".repeat(200);
        let truncated = truncate_description(&text, 181);
        assert!(truncated.len() <= 181);
        assert!(text.starts_with(&truncated));
    }
}
