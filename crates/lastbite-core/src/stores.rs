//! Store listings returned by the nearby-stores endpoint.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::GeoPoint;
use crate::units::km_to_miles;

/// Opaque identifier of a store's public listing.
///
/// The backend sends integer IDs today; strings are accepted as well so the
/// client does not care how the identifier is minted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BusinessId(String);

impl BusinessId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BusinessId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self(n.to_string()),
            RawId::Str(s) => Self(s),
        })
    }
}

/// A product highlighted in a store's map popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedProduct {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

/// One store within the search radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreListing {
    pub business_id: BusinessId,
    pub owner_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(flatten)]
    pub location: GeoPoint,
    /// Distance from the search center in kilometers, unrounded.
    #[serde(rename = "distance")]
    pub distance_km: f64,
    #[serde(default)]
    pub product_count: u64,
    /// Products in backend order; only the first few are ever displayed.
    #[serde(rename = "products", default)]
    pub featured_products: Vec<FeaturedProduct>,
}

impl StoreListing {
    /// Street, city, state and ZIP joined with `", "`, skipping blank parts.
    ///
    /// Returns `None` when every part is missing.
    #[must_use]
    pub fn address_line(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.address, &self.city, &self.state, &self.zip_code]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    #[must_use]
    pub fn distance_miles(&self) -> f64 {
        km_to_miles(self.distance_km)
    }

    /// Image of the first featured product, used as the popup header.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.featured_products
            .first()
            .and_then(|p| p.image.as_deref())
            .filter(|url| !url.is_empty())
    }
}
