//! Popup content of a store marker.

use std::fmt::Write as _;

use lastbite_core::{display_miles, format_currency, StoreListing};

/// How many featured products a popup lists before summarising the rest.
pub const FEATURED_LIMIT: usize = 2;

/// Popup of a single store marker, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct StorePopup {
    pub title: String,
    pub cover_image: Option<String>,
    pub address_line: Option<String>,
    /// Distance in miles, two decimals.
    pub distance_miles: String,
    pub item_count: u64,
    /// `(title, formatted price)` of at most [`FEATURED_LIMIT`] products.
    pub featured: Vec<(String, String)>,
    /// Products beyond the listed ones.
    pub more_count: usize,
    pub store_url: String,
}

impl StorePopup {
    #[must_use]
    pub fn from_listing(listing: &StoreListing, store_page_prefix: &str) -> Self {
        let featured = listing
            .featured_products
            .iter()
            .take(FEATURED_LIMIT)
            .map(|p| (p.title.clone(), format_currency(p.price)))
            .collect();
        Self {
            title: listing.owner_name.clone(),
            cover_image: listing.cover_image().map(str::to_owned),
            address_line: listing.address_line(),
            distance_miles: display_miles(listing.distance_km),
            item_count: listing.product_count,
            featured,
            more_count: listing
                .featured_products
                .len()
                .saturating_sub(FEATURED_LIMIT),
            store_url: store_url(store_page_prefix, listing.business_id.as_str()),
        }
    }

    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{} miles away", self.distance_miles)
    }

    #[must_use]
    pub fn items_label(&self) -> String {
        let plural = if self.item_count == 1 { "" } else { "s" };
        format!("{} item{plural} available", self.item_count)
    }

    /// `"+N more item(s)"`, or `None` when every product is already listed.
    #[must_use]
    pub fn more_label(&self) -> Option<String> {
        if self.more_count == 0 {
            return None;
        }
        let plural = if self.more_count == 1 { "" } else { "s" };
        Some(format!("+{} more item{plural}", self.more_count))
    }

    /// Renders the popup body. All interpolated text is HTML-escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<div class="business-popup">"#);

        if let Some(image) = &self.cover_image {
            let _ = write!(
                html,
                r#"<img class="business-popup__image" src="{}" alt="{}">"#,
                escape_html(image),
                escape_html(&self.title)
            );
        }

        let _ = write!(
            html,
            r#"<h6 class="business-popup__title"><i class="fas fa-store"></i> {}</h6>"#,
            escape_html(&self.title)
        );

        html.push_str(r#"<div class="business-popup__details">"#);
        if let Some(address) = &self.address_line {
            let _ = write!(
                html,
                r#"<p class="business-popup__address"><i class="fas fa-map-marker-alt"></i> {}</p>"#,
                escape_html(address)
            );
        }
        let _ = write!(
            html,
            r#"<p class="business-popup__distance"><i class="fas fa-location-arrow"></i> {}</p>"#,
            escape_html(&self.distance_label())
        );
        let availability = if self.item_count > 0 {
            "in-stock"
        } else {
            "out-of-stock"
        };
        let _ = write!(
            html,
            r#"<p class="business-popup__items {availability}"><i class="fas fa-box"></i> {}</p>"#,
            escape_html(&self.items_label())
        );
        html.push_str("</div>");

        if !self.featured.is_empty() {
            html.push_str(r#"<div class="business-popup__featured"><p>Featured Items:</p>"#);
            for (title, price) in &self.featured {
                let _ = write!(
                    html,
                    r#"<div class="business-popup__product">&bull; {} - <strong>{}</strong></div>"#,
                    escape_html(title),
                    escape_html(price)
                );
            }
            if let Some(more) = self.more_label() {
                let _ = write!(
                    html,
                    r#"<p class="business-popup__more">{}</p>"#,
                    escape_html(&more)
                );
            }
            html.push_str("</div>");
        }

        let _ = write!(
            html,
            r#"<a class="btn btn-sm btn-success w-100" href="{}"><i class="fas fa-shopping-bag"></i> Visit Store</a>"#,
            escape_html(&self.store_url)
        );
        html.push_str("</div>");
        html
    }
}

/// `<prefix><id>/`, tolerating a prefix with or without a trailing slash.
fn store_url(prefix: &str, business_id: &str) -> String {
    format!("{}/{business_id}/", prefix.trim_end_matches('/'))
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
