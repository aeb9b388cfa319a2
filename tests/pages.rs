use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
use axum::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::ServiceExt;

use dimora::application::catalog::CatalogService;
use dimora::application::chrome::ChromeService;
use dimora::application::repos::ListingsRepo;
use dimora::application::sitemap::SitemapService;
use dimora::cache::{CacheConfig, CachedPage, CacheState, CacheWarmer, PageKey, ResponseStore};
use dimora::config::SiteSettings;
use dimora::infra::http::api::rate_limit::ApiRateLimiter;
use dimora::infra::http::{self, ApiState, HttpState, RouterState};
use dimora::infra::store::InMemoryListings;

fn site_settings() -> SiteSettings {
    SiteSettings {
        public_site_url: "http://localhost:3000".to_string(),
        brand_title: "Dimora".to_string(),
        footer_copy: "Dimora Lettings — a demonstration site; no real properties.".to_string(),
        meta_title: "Dimora — Rental Listings".to_string(),
        meta_description: "Browse rental apartments, studios and houses across the north of England."
            .to_string(),
        og_title: "Dimora — Rental Listings".to_string(),
        og_description: "Browse rental apartments, studios and houses across the north of England."
            .to_string(),
        featured_ids: vec!["1".to_string(), "2".to_string(), "3".to_string()],
        cities: vec![
            "Manchester".to_string(),
            "Leeds".to_string(),
            "Liverpool".to_string(),
            "Sheffield".to_string(),
            "York".to_string(),
        ],
    }
}

fn build_router_state(cache: Option<CacheState>, rate_limit_max: u32) -> RouterState {
    let listings: Arc<dyn ListingsRepo> =
        Arc::new(InMemoryListings::without_delay().expect("valid record set"));
    let site = Arc::new(site_settings());

    let http_state = HttpState {
        catalog: Arc::new(CatalogService::new(listings.clone(), site.clone())),
        chrome: Arc::new(ChromeService::new(site.clone())),
        sitemap: Arc::new(SitemapService::new(listings.clone(), site)),
        cache,
    };
    let api_state = ApiState {
        listings,
        rate_limiter: Arc::new(ApiRateLimiter::new(
            Duration::from_secs(60),
            rate_limit_max,
        )),
    };

    RouterState {
        http: http_state,
        api: api_state,
    }
}

fn build_app(state: RouterState) -> Router {
    http::build_router(state.clone())
        .merge(http::build_api_v1_router(state.clone()))
        .with_state(state)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds")
}

async fn body_string(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

// ============ HTML pages ============

#[tokio::test]
async fn landing_page_renders_stats_and_featured_listings() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Across the portfolio"));
    assert!(body.contains("£987 pcm"));
    assert!(body.contains("£550 pcm"));
    assert!(body.contains("£1,600 pcm"));
    assert!(body.contains("Two-Bed Apartment in the Northern Quarter"));
    assert!(body.contains("One-Bed Flat by the Leeds Dock"));
    assert!(body.contains("Studio on the Baltic Triangle"));
    assert!(body.contains("application/ld+json"));
    assert!(body.contains("\"@type\":\"ItemList\""));
    assert!(body.contains(r#"<link rel="canonical" href="http://localhost:3000">"#));
}

#[tokio::test]
async fn listings_page_applies_every_filter() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/listings?city=manchester&min_bedrooms=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Showing 2 of 8 homes"));
    assert!(body.contains("/listings/1"));
    assert!(body.contains("/listings/5"));
    assert!(!body.contains("/listings/4\""));
    assert!(body.contains("Listings in manchester, 2+ bedrooms"));
}

#[tokio::test]
async fn listings_page_with_no_matches_renders_the_empty_state() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/listings?max_price=100").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Showing 0 of 8 homes"));
    assert!(body.contains("No homes match these filters"));
}

#[tokio::test]
async fn malformed_numeric_filter_is_rejected_with_400() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/listings?min_bedrooms=two").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let api_response = get(&app, "/api/v1/listings?min_bedrooms=two").await;
    assert_eq!(api_response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_filter_values_impose_no_constraint() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/listings?city=&min_bedrooms=&max_price=").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Showing 8 of 8 homes"));
}

#[tokio::test]
async fn detail_page_renders_structured_data() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/listings/3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Studio on the Baltic Triangle"));
    assert!(body.contains("£650 pcm"));
    assert!(body.contains("\"@type\":\"Apartment\""));
    assert!(body.contains(r#"<link rel="canonical" href="http://localhost:3000/listings/3">"#));
}

#[tokio::test]
async fn unknown_listing_renders_the_not_found_page() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/listings/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_string(response).await;
    assert!(body.contains("Page Not Found"));
    assert!(body.contains("Browse all listings"));
}

#[tokio::test]
async fn unknown_paths_render_the_styled_not_found_page() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/no-such-page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_string(response).await;
    assert!(body.contains("Page Not Found"));
}

#[tokio::test]
async fn featured_ids_resolve_to_real_listings() {
    let state = build_router_state(None, 200);

    let featured = state.http.catalog.featured_ids().to_vec();
    assert_eq!(featured, vec!["1", "2", "3"]);

    let ids = state.api.listings.list_ids().await.expect("ids listed");
    for id in &featured {
        assert!(ids.contains(id));
    }
}

// ============ Sitemap and robots ============

#[tokio::test]
async fn sitemap_enumerates_pages_cities_and_listings() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/xml")
    );

    let body = body_string(response).await;
    assert!(body.contains("<loc>http://localhost:3000/listings</loc>"));
    assert!(body.contains("<loc>http://localhost:3000/listings?city=manchester</loc>"));
    assert!(body.contains("<loc>http://localhost:3000/listings/8</loc>"));
}

#[tokio::test]
async fn robots_points_crawlers_at_the_sitemap() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/robots.txt").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("User-agent: *"));
    assert!(body.contains("Sitemap: http://localhost:3000/sitemap.xml"));
}

#[tokio::test]
async fn health_endpoint_returns_no_content() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/_health").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ============ Page cache ============

fn cache_state() -> CacheState {
    let config = CacheConfig::default();
    CacheState {
        store: Arc::new(ResponseStore::new(&config)),
        config,
    }
}

fn sentinel_page(body: &str, expires_at: Instant) -> CachedPage {
    CachedPage {
        status: 200,
        headers: vec![(
            "content-type".to_string(),
            "text/html; charset=utf-8".to_string(),
        )],
        body: Bytes::from(body.to_string()),
        expires_at,
    }
}

#[tokio::test]
async fn warmup_pre_renders_the_landing_and_featured_pages() {
    let cache = cache_state();
    let state = build_router_state(Some(cache.clone()), 200);

    CacheWarmer::new(state.http.clone())
        .warm_initial()
        .await
        .expect("warmup succeeds");

    // landing page plus the three featured detail pages
    assert_eq!(cache.store.len(), 4);
    assert!(cache.store.get(&PageKey::new("/", "")).is_some());
    assert!(cache.store.get(&PageKey::new("/listings/1", "")).is_some());
    assert!(cache.store.get(&PageKey::new("/listings/2", "")).is_some());
    assert!(cache.store.get(&PageKey::new("/listings/3", "")).is_some());
}

#[tokio::test]
async fn fresh_cache_entries_are_served_without_rendering() {
    let cache = cache_state();
    let app = build_app(build_router_state(Some(cache.clone()), 200));

    cache.store.insert(
        PageKey::new("/", ""),
        sentinel_page("sentinel body", Instant::now() + Duration::from_secs(60)),
    );

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "sentinel body");
}

#[tokio::test]
async fn expired_cache_entries_are_re_rendered_and_replaced() {
    let cache = cache_state();
    let app = build_app(build_router_state(Some(cache.clone()), 200));

    cache.store.insert(
        PageKey::new("/", ""),
        sentinel_page("stale sentinel", Instant::now()),
    );

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Across the portfolio"));
    assert!(!body.contains("stale sentinel"));

    let (replaced, freshness) = cache
        .store
        .get(&PageKey::new("/", ""))
        .expect("entry replaced");
    assert_eq!(freshness, dimora::cache::Freshness::Fresh);
    assert!(!replaced.body.is_empty());
}

#[tokio::test]
async fn on_demand_pages_are_cached_after_first_render() {
    let cache = cache_state();
    let app = build_app(build_router_state(Some(cache.clone()), 200));

    let key = PageKey::new("/listings/7", "");
    assert!(cache.store.get(&key).is_none());

    let response = get(&app, "/listings/7").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cache.store.get(&key).is_some());
}

#[tokio::test]
async fn differently_filtered_list_pages_cache_independently() {
    let cache = cache_state();
    let app = build_app(build_router_state(Some(cache.clone()), 200));

    get(&app, "/listings?city=manchester").await;
    get(&app, "/listings?city=leeds").await;

    assert!(
        cache
            .store
            .get(&PageKey::new("/listings", "city=manchester"))
            .is_some()
    );
    assert!(
        cache
            .store
            .get(&PageKey::new("/listings", "city=leeds"))
            .is_some()
    );
    assert_eq!(cache.store.len(), 2);
}

#[tokio::test]
async fn not_found_pages_are_not_cached() {
    let cache = cache_state();
    let app = build_app(build_router_state(Some(cache.clone()), 200));

    let response = get(&app, "/listings/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(cache.store.is_empty());
}

// ============ API rate limiting ============

#[tokio::test]
async fn api_requests_beyond_the_window_limit_are_rejected() {
    let app = build_app(build_router_state(None, 3));

    for _ in 0..3 {
        let response = get(&app, "/api/v1/stats").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(&app, "/api/v1/stats").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    let value: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json error body");
    assert_eq!(value["error"]["code"], "rate_limited");
}

#[tokio::test]
async fn html_pages_are_not_rate_limited() {
    let app = build_app(build_router_state(None, 1));

    for _ in 0..5 {
        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// ============ API through the router ============

#[tokio::test]
async fn api_filtered_list_round_trips_through_the_router() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/api/v1/listings?max_price=700").await;
    assert_eq!(response.status(), StatusCode::OK);

    let value: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    assert_eq!(value["total"], 2);
    assert_eq!(value["items"][0]["id"], "3");
    assert_eq!(value["items"][1]["id"], "7");
}

#[tokio::test]
async fn api_absent_listing_is_a_json_404() {
    let app = build_app(build_router_state(None, 200));

    let response = get(&app, "/api/v1/listings/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let value: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json error body");
    assert_eq!(value["error"]["code"], "not_found");
}
