use lastbite_client::ClientError;
use thiserror::Error;

use super::geolocation::GeolocationError;

/// Where a locator session stands.
///
/// ```text
/// Idle ──detect / ZIP──▶ Resolving ──ok──▶ MapReady ──▶ QueryingStores ──ok──▶ Rendered
///   ▲                        │                              │                     │
///   └────────── error ───────┘◀──────────── error ──────────┘      radius change ─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocatorState {
    #[default]
    Idle,
    Resolving,
    MapReady,
    QueryingStores,
    Rendered,
}

/// Why a locator handler ended without rendering stores.
///
/// By the time a handler returns one of these the user has already been
/// told (except for [`LocatorError::Superseded`] and
/// [`LocatorError::NoLocation`], which are silent).
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("no ZIP code entered")]
    EmptyZip,

    #[error("geolocation is not supported")]
    GeolocationUnsupported,

    #[error("geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("ZIP code lookup failed: {0}")]
    Geocode(#[source] ClientError),

    #[error("store query failed: {0}")]
    Stores(#[source] ClientError),

    /// A newer search started while this one was waiting on the network;
    /// its result was dropped.
    #[error("superseded by a newer search")]
    Superseded,

    /// Radius changed before any location was resolved, or while one is
    /// still resolving.
    #[error("no resolved location to search around")]
    NoLocation,
}
