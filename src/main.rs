use std::{process, sync::Arc, time::Duration};

use dimora::{
    application::{
        catalog::CatalogService, chrome::ChromeService, error::AppError, repos::ListingsRepo,
        sitemap::SitemapService,
    },
    cache::{CacheConfig, CacheState, CacheWarmer, ResponseStore},
    config,
    infra::{
        error::InfraError,
        export,
        http::{self, ApiRateLimiter, ApiState, HttpState, RouterState},
        latency::DelayPolicy,
        store::InMemoryListings,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::ExportSite(args) => run_export(settings, args).await,
    }
}

struct ApplicationContext {
    http_state: HttpState,
    api_state: ApiState,
}

fn build_application_context(settings: &config::Settings) -> Result<ApplicationContext, AppError> {
    let delay = DelayPolicy::from_settings(&settings.latency);
    if delay.is_enabled() {
        info!(target = "dimora::bootstrap", "simulated store latency enabled");
    }

    let listings: Arc<dyn ListingsRepo> =
        Arc::new(InMemoryListings::new(delay).map_err(AppError::from)?);
    let site = Arc::new(settings.site.clone());

    let catalog = Arc::new(CatalogService::new(listings.clone(), site.clone()));
    let chrome = Arc::new(ChromeService::new(site.clone()));
    let sitemap = Arc::new(SitemapService::new(listings.clone(), site.clone()));

    let cache_config = CacheConfig::from(&settings.cache);
    let cache = cache_config.enabled.then(|| CacheState {
        store: Arc::new(ResponseStore::new(&cache_config)),
        config: cache_config,
    });

    let http_state = HttpState {
        catalog,
        chrome,
        sitemap,
        cache,
    };

    let rate_limiter = Arc::new(ApiRateLimiter::new(
        Duration::from_secs(settings.api_rate_limit.window_seconds.get() as u64),
        settings.api_rate_limit.max_requests.get(),
    ));
    let api_state = ApiState {
        listings,
        rate_limiter,
    };

    Ok(ApplicationContext {
        http_state,
        api_state,
    })
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let app = build_application_context(&settings)?;

    // Eager generation: pre-render the landing page and featured detail pages
    CacheWarmer::new(app.http_state.clone())
        .warm_initial()
        .await
        .map_err(|err| AppError::unexpected(format!("cache warmup failed: {err}")))?;

    serve_http(&settings, app.http_state, app.api_state).await
}

async fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let app = build_application_context(&settings)?;

    info!(
        target = "dimora::export",
        path = %args.dir.display(),
        "Starting export"
    );

    export::export_site(&app.http_state, &args.dir).await
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    api_state: ApiState,
) -> Result<(), AppError> {
    let router_state = RouterState {
        http: http_state,
        api: api_state,
    };
    let public_router = http::build_router(router_state.clone());
    let api_router = http::build_api_v1_router(router_state.clone());

    let app = public_router.merge(api_router).with_state(router_state);

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "dimora::bootstrap",
        addr = %settings.server.public_addr,
        "listening"
    );

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
