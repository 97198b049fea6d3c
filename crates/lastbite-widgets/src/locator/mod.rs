//! Store locator: resolve a point (device position or ZIP code), center a
//! map on it, and show the stores within the selected radius.
//!
//! One [`StoreLocator`] owns one map widget. Every detect, ZIP search and
//! radius query takes a new generation number; a response that comes back
//! after a newer generation started is dropped, so the markers on the map
//! always belong to the most recent completed search.

mod geolocation;
mod map;
mod popup;
mod state;
mod view;

use std::cell::{Cell, RefCell};

use lastbite_client::{ClientError, DashboardClient};
use lastbite_core::{Bounds, GeoPoint, RadiusMiles, StoreListing};

pub use geolocation::{GeolocationError, Geolocator};
pub use map::{MapSurface, MarkerId, MarkerKind, MarkerSpec};
pub use popup::{StorePopup, FEATURED_LIMIT};
pub use state::{LocatorError, LocatorState};
pub use view::{store_count_label, LocatorView};

/// Zoom level of a freshly created map.
pub const DEFAULT_ZOOM: u8 = 13;

/// Share of the marker span added around the fitted viewport.
pub const FIT_PADDING: f64 = 0.1;

const USER_POPUP_HTML: &str = "<b>You are here</b>";

const MSG_GEOLOCATION_UNSUPPORTED: &str =
    "Geolocation is not supported by your browser. Please enter a ZIP code.";
const MSG_GEOLOCATION_DENIED: &str =
    "Unable to detect location. Please enable location access or enter a ZIP code.";
const MSG_GEOLOCATION_FAILED: &str = "Unable to detect location. Please enter a ZIP code to search.";
const MSG_EMPTY_ZIP: &str = "Please enter a ZIP code";
const MSG_ZIP_NOT_FOUND: &str = "ZIP code not found";
const MSG_ZIP_FAILED: &str = "Failed to search ZIP code. Please try again.";
const MSG_STORES_FAILED: &str = "Failed to load nearby stores";
const MSG_NO_RESULTS: &str = "No stores found in this area. Try increasing the search radius.";

/// Map and markers of the current session.
#[derive(Debug, Default)]
struct MapSession {
    map_open: bool,
    center: Option<GeoPoint>,
    user_marker: Option<MarkerId>,
    store_markers: Vec<MarkerId>,
}

pub struct StoreLocator<M, V, G> {
    client: DashboardClient,
    map: M,
    view: V,
    geolocator: G,
    store_page_prefix: String,
    radius: Cell<RadiusMiles>,
    generation: Cell<u64>,
    state: Cell<LocatorState>,
    session: RefCell<MapSession>,
}

impl<M, V, G> StoreLocator<M, V, G>
where
    M: MapSurface,
    V: LocatorView,
    G: Geolocator,
{
    pub fn new(
        client: DashboardClient,
        map: M,
        view: V,
        geolocator: G,
        store_page_prefix: impl Into<String>,
        radius: RadiusMiles,
    ) -> Self {
        Self {
            client,
            map,
            view,
            geolocator,
            store_page_prefix: store_page_prefix.into(),
            radius: Cell::new(radius),
            generation: Cell::new(0),
            state: Cell::new(LocatorState::Idle),
            session: RefCell::new(MapSession::default()),
        }
    }

    #[must_use]
    pub fn state(&self) -> LocatorState {
        self.state.get()
    }

    #[must_use]
    pub fn radius(&self) -> RadiusMiles {
        self.radius.get()
    }

    /// The point the current map is centered on.
    #[must_use]
    pub fn center(&self) -> Option<GeoPoint> {
        self.session.borrow().center
    }

    #[must_use]
    pub fn store_marker_count(&self) -> usize {
        self.session.borrow().store_markers.len()
    }

    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The page opens by trying the device position.
    ///
    /// # Errors
    ///
    /// See [`StoreLocator::detect_location`].
    pub async fn on_page_load(&self) -> Result<usize, LocatorError> {
        self.detect_location().await
    }

    /// Resolves the device position, opens a map on it and loads stores.
    /// Returns the number of store markers rendered.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::GeolocationUnsupported`] / [`LocatorError::Geolocation`]
    ///   when no position could be obtained; the error banner points the
    ///   user at ZIP entry.
    /// - [`LocatorError::Stores`] when the store query fails.
    /// - [`LocatorError::Superseded`] when a newer search took over.
    pub async fn detect_location(&self) -> Result<usize, LocatorError> {
        if !self.geolocator.is_supported() {
            self.view.show_error(MSG_GEOLOCATION_UNSUPPORTED);
            return Err(LocatorError::GeolocationUnsupported);
        }

        let generation = self.begin_resolving();
        let position = self.geolocator.current_position().await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "dropping superseded geolocation result");
            return Err(LocatorError::Superseded);
        }
        self.view.set_loading(false);

        match position {
            Ok(point) => {
                tracing::debug!(?point, "device position resolved");
                self.open_map(point);
                self.query_stores(generation, point).await
            }
            Err(err) => {
                tracing::warn!(error = %err, "geolocation failed");
                let message = if err == GeolocationError::PermissionDenied {
                    MSG_GEOLOCATION_DENIED
                } else {
                    MSG_GEOLOCATION_FAILED
                };
                self.view.show_error(message);
                self.state.set(LocatorState::Idle);
                Err(err.into())
            }
        }
    }

    /// Resolves a ZIP code, opens a map on it and loads stores.
    ///
    /// Blank input is rejected before any request goes out.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::EmptyZip`] for blank input.
    /// - [`LocatorError::Geocode`] when the ZIP cannot be resolved.
    /// - [`LocatorError::Stores`] when the store query fails.
    /// - [`LocatorError::Superseded`] when a newer search took over.
    pub async fn search_zip(&self, input: &str) -> Result<usize, LocatorError> {
        let zip_code = input.trim();
        if zip_code.is_empty() {
            self.view.show_error(MSG_EMPTY_ZIP);
            return Err(LocatorError::EmptyZip);
        }

        let generation = self.begin_resolving();
        tracing::debug!(generation, zip_code, "searching by ZIP code");
        let result = self.client.geocode_zip(zip_code).await;
        if !self.is_current(generation) {
            tracing::debug!(generation, zip_code, "dropping superseded ZIP result");
            return Err(LocatorError::Superseded);
        }
        self.view.set_loading(false);

        match result {
            Ok(resolved) => {
                self.open_map(resolved.point);
                self.query_stores(generation, resolved.point).await
            }
            Err(err) => {
                if err.is_transport() {
                    tracing::error!(error = %err, zip_code, "ZIP code search failed");
                }
                self.view.show_error(&zip_error_message(&err));
                self.state.set(LocatorState::Idle);
                Err(LocatorError::Geocode(err))
            }
        }
    }

    /// Key handler of the ZIP input: Enter submits. Returns `None` for any
    /// other key.
    pub async fn on_zip_key(&self, key: &str, input: &str) -> Option<Result<usize, LocatorError>> {
        if key == "Enter" {
            Some(self.search_zip(input).await)
        } else {
            None
        }
    }

    /// Records a new radius and, when a map session exists, re-queries
    /// stores around the last resolved point.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::NoLocation`] when there is nothing to re-query yet;
    ///   the radius is still recorded and the next search uses it.
    /// - [`LocatorError::Stores`] / [`LocatorError::Superseded`] as for any
    ///   store query.
    pub async fn set_radius(&self, radius: RadiusMiles) -> Result<usize, LocatorError> {
        self.radius.set(radius);
        if self.state.get() == LocatorState::Resolving {
            return Err(LocatorError::NoLocation);
        }
        let center = {
            let session = self.session.borrow();
            session
                .center
                .filter(|_| session.map_open && session.user_marker.is_some())
        };
        let Some(center) = center else {
            return Err(LocatorError::NoLocation);
        };

        let generation = self.next_generation();
        tracing::debug!(generation, %radius, "radius changed, re-querying stores");
        self.query_stores(generation, center).await
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn begin_resolving(&self) -> u64 {
        let generation = self.next_generation();
        self.view.set_loading(true);
        self.view.hide_error();
        self.state.set(LocatorState::Resolving);
        generation
    }

    /// Replaces any existing map with a new one centered on `point`, with a
    /// user marker.
    fn open_map(&self, point: GeoPoint) {
        let mut session = self.session.borrow_mut();
        if session.map_open {
            for id in session.store_markers.drain(..) {
                self.map.remove_marker(id);
            }
            if let Some(id) = session.user_marker.take() {
                self.map.remove_marker(id);
            }
            self.map.destroy();
        }

        self.map.create(point, DEFAULT_ZOOM);
        let user_marker = self.map.add_marker(&MarkerSpec {
            kind: MarkerKind::User,
            position: point,
            popup_html: USER_POPUP_HTML.to_owned(),
            open_popup: true,
        });
        *session = MapSession {
            map_open: true,
            center: Some(point),
            user_marker: Some(user_marker),
            store_markers: Vec::new(),
        };
        self.state.set(LocatorState::MapReady);
    }

    async fn query_stores(&self, generation: u64, center: GeoPoint) -> Result<usize, LocatorError> {
        let radius = self.radius.get();
        self.view.set_loading(true);
        self.state.set(LocatorState::QueryingStores);
        tracing::debug!(generation, ?center, %radius, radius_km = radius.to_km(), "querying stores");

        let result = self.client.nearby_stores(center, radius.to_km()).await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "dropping superseded store results");
            return Err(LocatorError::Superseded);
        }
        self.view.set_loading(false);

        match result {
            Ok(stores) => Ok(self.render(center, &stores.listings)),
            Err(err) => {
                tracing::error!(error = %err, "failed to load nearby stores");
                let message = match &err {
                    ClientError::MissingEndpoint(name) => config_error_message(name),
                    _ => MSG_STORES_FAILED.to_owned(),
                };
                self.view.show_error(&message);
                self.state.set(LocatorState::Idle);
                Err(LocatorError::Stores(err))
            }
        }
    }

    /// Swaps the store markers for one per listing and fits the viewport.
    fn render(&self, center: GeoPoint, listings: &[StoreListing]) -> usize {
        let mut session = self.session.borrow_mut();
        for id in session.store_markers.drain(..) {
            self.map.remove_marker(id);
        }
        self.view.set_store_count(&store_count_label(listings.len()));
        self.state.set(LocatorState::Rendered);

        if listings.is_empty() {
            self.view.show_error(MSG_NO_RESULTS);
            return 0;
        }
        self.view.hide_error();

        for listing in listings {
            let popup = StorePopup::from_listing(listing, &self.store_page_prefix);
            let id = self.map.add_marker(&MarkerSpec {
                kind: MarkerKind::Store(listing.business_id.clone()),
                position: listing.location,
                popup_html: popup.to_html(),
                open_popup: false,
            });
            session.store_markers.push(id);
        }

        let points: Vec<GeoPoint> = std::iter::once(center)
            .chain(listings.iter().map(|l| l.location))
            .collect();
        if let Some(bounds) = Bounds::from_points(&points) {
            self.map.fit_bounds(&bounds.pad(FIT_PADDING));
        }
        tracing::debug!(stores = listings.len(), "stores rendered");
        listings.len()
    }
}

fn config_error_message(endpoint: &str) -> String {
    format!("Configuration error: {endpoint} URL not found")
}

fn zip_error_message(err: &ClientError) -> String {
    match err {
        ClientError::MissingEndpoint(name) => config_error_message(name),
        ClientError::Rejected { .. } => err
            .rejection_message()
            .unwrap_or(MSG_ZIP_NOT_FOUND)
            .to_owned(),
        _ => MSG_ZIP_FAILED.to_owned(),
    }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
