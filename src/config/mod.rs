//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "dimora";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_PUBLIC_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_BRAND_TITLE: &str = "Dimora";
const DEFAULT_FOOTER_COPY: &str = "Dimora Lettings — a demonstration site; no real properties.";
const DEFAULT_META_TITLE: &str = "Dimora — Rental Listings";
const DEFAULT_META_DESCRIPTION: &str =
    "Browse rental apartments, studios and houses across the north of England.";
const DEFAULT_FEATURED_IDS: [&str; 3] = ["1", "2", "3"];
const DEFAULT_CITIES: [&str; 5] = ["Manchester", "Leeds", "Liverpool", "Sheffield", "York"];
const DEFAULT_LATENCY_LIST_MS: (u64, u64) = (300, 500);
const DEFAULT_LATENCY_DETAIL_MS: (u64, u64) = (200, 300);
const DEFAULT_LATENCY_SUMMARY_MS: (u64, u64) = (100, 150);
const DEFAULT_CACHE_RESPONSE_LIMIT: usize = 200;
const DEFAULT_CACHE_LISTING_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_INDEX_TTL_SECS: u64 = 60;
const DEFAULT_API_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const DEFAULT_API_RATE_LIMIT_MAX_REQUESTS: u64 = 120;

/// Command-line arguments for the Dimora binary.
#[derive(Debug, Parser)]
#[command(name = "dimora", version, about = "Dimora listings server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "DIMORA_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Dimora HTTP service.
    Serve(Box<ServeArgs>),
    /// Write the eagerly generated pages, sitemap and robots.txt to a directory.
    #[command(name = "export")]
    ExportSite(ExportArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the public site URL used for canonical links and the sitemap.
    #[arg(long = "site-public-url", value_name = "URL")]
    pub public_site_url: Option<String>,

    /// Toggle the simulated network latency on the listing store.
    #[arg(
        long = "latency",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub latency_enabled: Option<bool>,

    /// Toggle the page cache.
    #[arg(
        long = "cache",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_enabled: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Directory to write the exported site into.
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Override the public site URL used for canonical links and the sitemap.
    #[arg(long = "site-public-url", value_name = "URL")]
    pub public_site_url: Option<String>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub site: SiteSettings,
    pub latency: LatencySettings,
    pub cache: CacheSettings,
    pub api_rate_limit: ApiRateLimitSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub public_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub public_site_url: String,
    pub brand_title: String,
    pub footer_copy: String,
    pub meta_title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
    /// Listing ids pre-rendered eagerly at startup and by `dimora export`.
    /// A hand-picked policy value, never computed from usage.
    pub featured_ids: Vec<String>,
    /// City names enumerated as filtered-list URLs in the sitemap.
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct DelayBounds {
    pub min: Duration,
    pub max: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct LatencySettings {
    pub enabled: bool,
    pub list: DelayBounds,
    pub detail: DelayBounds,
    pub summary: DelayBounds,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub response_limit: usize,
    pub listing_ttl: Duration,
    pub index_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct ApiRateLimitSettings {
    pub window_seconds: NonZeroU32,
    pub max_requests: NonZeroU32,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("DIMORA").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::ExportSite(args)) => raw.apply_export_overrides(args),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    site: RawSiteSettings,
    latency: RawLatencySettings,
    cache: RawCacheSettings,
    api_rate_limit: RawApiRateLimitSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.public_site_url.as_ref() {
            self.site.public_site_url = Some(url.clone());
        }
        if let Some(enabled) = overrides.latency_enabled {
            self.latency.enabled = Some(enabled);
        }
        if let Some(enabled) = overrides.cache_enabled {
            self.cache.enabled = Some(enabled);
        }
    }

    fn apply_export_overrides(&mut self, args: &ExportArgs) {
        if let Some(url) = args.public_site_url.as_ref() {
            self.site.public_site_url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            site,
            latency,
            cache,
            api_rate_limit,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let site = build_site_settings(site)?;
        let latency = build_latency_settings(latency)?;
        let cache = build_cache_settings(cache)?;
        let api_rate_limit = build_api_rate_limit_settings(api_rate_limit)?;

        Ok(Self {
            server,
            logging,
            site,
            latency,
            cache,
            api_rate_limit,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PUBLIC_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let public_addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.public_addr", reason))?;

    Ok(ServerSettings { public_addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let public_site_url = site
        .public_site_url
        .unwrap_or_else(|| DEFAULT_PUBLIC_SITE_URL.to_string());

    let parsed = Url::parse(&public_site_url)
        .map_err(|err| LoadError::invalid("site.public_site_url", err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "site.public_site_url",
            "scheme must be http or https",
        ));
    }

    let meta_title = site
        .meta_title
        .unwrap_or_else(|| DEFAULT_META_TITLE.to_string());
    let meta_description = site
        .meta_description
        .unwrap_or_else(|| DEFAULT_META_DESCRIPTION.to_string());
    let og_title = site.og_title.unwrap_or_else(|| meta_title.clone());
    let og_description = site
        .og_description
        .unwrap_or_else(|| meta_description.clone());

    let featured_ids = site
        .featured_ids
        .unwrap_or_else(|| DEFAULT_FEATURED_IDS.map(String::from).to_vec());
    if featured_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(LoadError::invalid(
            "site.featured_ids",
            "ids must not be empty",
        ));
    }

    let cities = site
        .cities
        .unwrap_or_else(|| DEFAULT_CITIES.map(String::from).to_vec());
    if cities.iter().any(|city| city.trim().is_empty()) {
        return Err(LoadError::invalid(
            "site.cities",
            "city names must not be empty",
        ));
    }

    Ok(SiteSettings {
        public_site_url,
        brand_title: site
            .brand_title
            .unwrap_or_else(|| DEFAULT_BRAND_TITLE.to_string()),
        footer_copy: site
            .footer_copy
            .unwrap_or_else(|| DEFAULT_FOOTER_COPY.to_string()),
        meta_title,
        meta_description,
        og_title,
        og_description,
        featured_ids,
        cities,
    })
}

fn build_latency_settings(latency: RawLatencySettings) -> Result<LatencySettings, LoadError> {
    let list = build_delay_bounds(
        latency.list_min_ms,
        latency.list_max_ms,
        DEFAULT_LATENCY_LIST_MS,
        "latency.list",
    )?;
    let detail = build_delay_bounds(
        latency.detail_min_ms,
        latency.detail_max_ms,
        DEFAULT_LATENCY_DETAIL_MS,
        "latency.detail",
    )?;
    let summary = build_delay_bounds(
        latency.summary_min_ms,
        latency.summary_max_ms,
        DEFAULT_LATENCY_SUMMARY_MS,
        "latency.summary",
    )?;

    Ok(LatencySettings {
        enabled: latency.enabled.unwrap_or(false),
        list,
        detail,
        summary,
    })
}

fn build_delay_bounds(
    min_ms: Option<u64>,
    max_ms: Option<u64>,
    default: (u64, u64),
    key: &'static str,
) -> Result<DelayBounds, LoadError> {
    let min_ms = min_ms.unwrap_or(default.0);
    let max_ms = max_ms.unwrap_or(default.1);
    if min_ms > max_ms {
        return Err(LoadError::invalid(
            key,
            format!("minimum delay {min_ms}ms exceeds maximum {max_ms}ms"),
        ));
    }
    Ok(DelayBounds {
        min: Duration::from_millis(min_ms),
        max: Duration::from_millis(max_ms),
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let listing_ttl_seconds = cache
        .listing_ttl_seconds
        .unwrap_or(DEFAULT_CACHE_LISTING_TTL_SECS);
    if listing_ttl_seconds == 0 {
        return Err(LoadError::invalid(
            "cache.listing_ttl_seconds",
            "must be greater than zero",
        ));
    }

    let index_ttl_seconds = cache
        .index_ttl_seconds
        .unwrap_or(DEFAULT_CACHE_INDEX_TTL_SECS);
    if index_ttl_seconds == 0 {
        return Err(LoadError::invalid(
            "cache.index_ttl_seconds",
            "must be greater than zero",
        ));
    }

    Ok(CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        response_limit: cache.response_limit.unwrap_or(DEFAULT_CACHE_RESPONSE_LIMIT),
        listing_ttl: Duration::from_secs(listing_ttl_seconds),
        index_ttl: Duration::from_secs(index_ttl_seconds),
    })
}

fn build_api_rate_limit_settings(
    rate_limit: RawApiRateLimitSettings,
) -> Result<ApiRateLimitSettings, LoadError> {
    let window_seconds_val = rate_limit
        .window_seconds
        .unwrap_or(DEFAULT_API_RATE_LIMIT_WINDOW_SECS);
    let window_seconds = non_zero_u32(window_seconds_val, "api_rate_limit.window_seconds")?;

    let max_requests_val = rate_limit
        .max_requests
        .unwrap_or(DEFAULT_API_RATE_LIMIT_MAX_REQUESTS);
    let max_requests = non_zero_u32(max_requests_val, "api_rate_limit.max_requests")?;

    Ok(ApiRateLimitSettings {
        window_seconds,
        max_requests,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    public_site_url: Option<String>,
    brand_title: Option<String>,
    footer_copy: Option<String>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    og_title: Option<String>,
    og_description: Option<String>,
    featured_ids: Option<Vec<String>>,
    cities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLatencySettings {
    enabled: Option<bool>,
    list_min_ms: Option<u64>,
    list_max_ms: Option<u64>,
    detail_min_ms: Option<u64>,
    detail_max_ms: Option<u64>,
    summary_min_ms: Option<u64>,
    summary_max_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    response_limit: Option<usize>,
    listing_ttl_seconds: Option<u64>,
    index_ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiRateLimitSettings {
    window_seconds: Option<u64>,
    max_requests: Option<u64>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
