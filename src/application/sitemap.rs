//! Sitemap service for sitemap.xml and robots.txt generation.
//!
//! This service encapsulates the logic for enumerating every page that
//! exists, keeping the HTTP layer focused on request/response handling.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{ListingsRepo, RepoError};
use crate::config::SiteSettings;

/// Service for generating sitemap.xml and robots.txt.
#[derive(Clone)]
pub struct SitemapService {
    listings: Arc<dyn ListingsRepo>,
    site: Arc<SiteSettings>,
}

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to list listing ids: {0}")]
    Listings(String),
}

impl From<RepoError> for SitemapError {
    fn from(err: RepoError) -> Self {
        SitemapError::Listings(err.to_string())
    }
}

impl SitemapService {
    pub fn new(listings: Arc<dyn ListingsRepo>, site: Arc<SiteSettings>) -> Self {
        Self { listings, site }
    }

    /// Generate sitemap.xml content: the landing page, the listings index,
    /// one filtered-list URL per configured city, and one URL per listing id.
    pub async fn sitemap_xml(&self) -> Result<String, SitemapError> {
        let base = normalize_public_site_url(&self.site.public_site_url);
        let mut entries = Vec::new();

        entries.push(sitemap_entry(&base, "/"));
        entries.push(sitemap_entry(&base, "/listings"));

        for city in &self.site.cities {
            entries.push(sitemap_entry(
                &base,
                &format!("/listings?city={}", city.to_ascii_lowercase()),
            ));
        }

        for id in self.listings.list_ids().await? {
            entries.push(sitemap_entry(&base, &format!("/listings/{id}")));
        }

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for entry in entries {
            xml.push_str(&entry);
        }
        xml.push_str("</urlset>\n");
        Ok(xml)
    }

    /// Generate robots.txt content.
    pub fn robots_txt(&self) -> String {
        let base = normalize_public_site_url(&self.site.public_site_url);
        let sitemap_url = format!("{base}sitemap.xml");
        format!("User-agent: *\nAllow: /\nSitemap: {sitemap_url}\n")
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

fn sitemap_entry(base: &str, path: &str) -> String {
    let loc = canonical_url(base, path);
    format!("  <url><loc>{}</loc></url>\n", escape_xml(&loc))
}

fn canonical_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path == "/" {
        base.to_string()
    } else {
        format!("{base}{path}")
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
