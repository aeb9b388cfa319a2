use std::sync::Arc;

use crate::config::SiteSettings;
use crate::presentation::views::{
    BrandView, FooterView, LayoutChrome, NavigationLinkView, NavigationView, PageMetaView,
};

/// Builds the layout chrome (brand, navigation, footer, base meta) shared by
/// every public page. All of it derives from site settings; nothing is loaded
/// at request time.
#[derive(Clone)]
pub struct ChromeService {
    site: Arc<SiteSettings>,
}

impl ChromeService {
    pub fn new(site: Arc<SiteSettings>) -> Self {
        Self { site }
    }

    pub fn load(&self) -> LayoutChrome {
        let entries = vec![
            NavigationLinkView {
                label: "Home".to_string(),
                href: "/".to_string(),
            },
            NavigationLinkView {
                label: "Listings".to_string(),
                href: "/listings".to_string(),
            },
        ];

        LayoutChrome {
            brand: BrandView {
                title: self.site.brand_title.clone(),
                href: "/".to_string(),
            },
            navigation: NavigationView { entries },
            footer: FooterView {
                copy: self.site.footer_copy.clone(),
            },
            meta: PageMetaView {
                title: self.site.meta_title.clone(),
                description: self.site.meta_description.clone(),
                og_title: self.site.og_title.clone(),
                og_description: self.site.og_description.clone(),
                canonical: self.site.public_site_url.clone(),
            },
        }
    }
}
