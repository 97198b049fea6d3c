//! Response envelopes of the backend endpoints and the typed results built
//! from them.

use lastbite_core::{GeoPoint, StatsSnapshot, StoreListing};
use serde::Deserialize;

/// `GET <stats>` → `{ success, stats }`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stats: Option<StatsSnapshot>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST <geocode>` → `{ success, latitude, longitude, display_name }` or
/// `{ success: false, error }`.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET <nearby>?lat=&lng=&radius=` → `{ success, count, businesses }`.
/// The backend's `count` is not kept; the listings are the count.
#[derive(Debug, Deserialize)]
pub(crate) struct NearbyEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub businesses: Vec<StoreListing>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET <payment-config>` → `{ publishableKey }`.
#[derive(Debug, Deserialize)]
pub(crate) struct PaymentConfigEnvelope {
    #[serde(rename = "publishableKey", default)]
    pub publishable_key: Option<String>,
}

/// `POST <checkout-session>` → `{ sessionId }` or `{ error }`.
#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutSessionEnvelope {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A ZIP code resolved to coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub point: GeoPoint,
    pub display_name: Option<String>,
}

/// Stores within the requested radius, nearest first as the backend sorts
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStores {
    pub listings: Vec<StoreListing>,
}
