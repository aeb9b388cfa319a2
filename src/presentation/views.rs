use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self {
            meta: self.meta.with_canonical(canonical),
            ..self
        }
    }

    pub fn with_meta(self, meta: PageMetaView) -> Self {
        Self { meta, ..self }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    pub canonical: String,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }

    pub fn with_content(self, title: String, description: String) -> Self {
        Self {
            og_title: title.clone(),
            og_description: description.clone(),
            title,
            description,
            ..self
        }
    }
}

/// Card summary for one listing on the landing and listings pages.
#[derive(Clone)]
pub struct ListingCard {
    pub id: String,
    pub path: String,
    pub title: String,
    pub city: String,
    pub address: String,
    pub price_label: String,
    pub rooms_label: String,
    pub available_label: String,
    pub summary: String,
    pub features: Vec<String>,
    pub image_url: String,
}

#[derive(Clone)]
pub struct StatsView {
    pub total_count: usize,
    pub distinct_cities: Vec<String>,
    pub average_price_label: String,
    pub min_price_label: String,
    pub max_price_label: String,
}

pub struct LandingContext {
    pub stats: StatsView,
    pub featured: Vec<ListingCard>,
    pub listings_ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<LandingContext>,
}

/// Raw filter values echoed back into the search form inputs.
#[derive(Clone, Default)]
pub struct FilterFormView {
    pub city: String,
    pub min_bedrooms: String,
    pub min_bathrooms: String,
    pub max_price: String,
}

pub struct ListingsContext {
    pub listings: Vec<ListingCard>,
    pub listing_count: usize,
    pub total_count: usize,
    pub has_results: bool,
    pub filter_label: Option<String>,
    pub form: FilterFormView,
    pub listings_ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "listings.html")]
pub struct ListingsTemplate {
    pub view: LayoutContext<ListingsContext>,
}

pub struct ListingDetailContext {
    pub id: String,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub price_label: String,
    pub rooms_label: String,
    pub available_label: String,
    pub features: Vec<String>,
    pub image_url: String,
    pub ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingTemplate {
    pub view: LayoutContext<ListingDetailContext>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. The listing may have been let, or the address may be mistyped.".to_string(),
            primary_action: Some(ErrorAction::listings()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn listings() -> Self {
        Self {
            href: "/listings".to_string(),
            label: "Browse all listings".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

/// Format a whole-pound monthly rent, e.g. `£1,100 pcm`.
pub fn format_price(price: u32) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("£{grouped} pcm")
}

pub fn rooms_label(bedrooms: u8, bathrooms: u8) -> String {
    let beds = match bedrooms {
        0 => "Studio".to_string(),
        1 => "1 bed".to_string(),
        n => format!("{n} beds"),
    };
    let baths = match bathrooms {
        1 => "1 bath".to_string(),
        n => format!("{n} baths"),
    };
    format!("{beds} · {baths}")
}
