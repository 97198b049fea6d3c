//! The map-library boundary.

use lastbite_core::{Bounds, BusinessId, GeoPoint};

/// Handle of a marker placed on a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// The resolved point the session is centered on.
    User,
    Store(BusinessId),
}

/// Everything the map library needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub kind: MarkerKind,
    pub position: GeoPoint,
    /// Popup body as HTML.
    pub popup_html: String,
    /// Open the popup as soon as the marker is placed.
    pub open_popup: bool,
}

/// A map widget (Leaflet, Mapbox, a terminal printer in the CLI).
///
/// Methods take `&self`: like DOM handles, implementations mutate the
/// page behind a shared reference.
pub trait MapSurface {
    /// Creates a fresh map centered on `center`. Only called when no map
    /// exists.
    fn create(&self, center: GeoPoint, zoom: u8);

    /// Tears the map down together with anything still drawn on it.
    fn destroy(&self);

    fn add_marker(&self, marker: &MarkerSpec) -> MarkerId;

    fn remove_marker(&self, id: MarkerId);

    /// Moves the viewport so `bounds` is fully visible.
    fn fit_bounds(&self, bounds: &Bounds);
}
