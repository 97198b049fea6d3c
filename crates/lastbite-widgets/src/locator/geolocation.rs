//! The device geolocation boundary.

use std::future::Future;

use lastbite_core::GeoPoint;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
}

/// Device position lookup with browser permission semantics.
pub trait Geolocator {
    /// `false` when the platform has no geolocation capability at all.
    fn is_supported(&self) -> bool;

    /// Asks for the current position. May prompt the user.
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, GeolocationError>>;
}
