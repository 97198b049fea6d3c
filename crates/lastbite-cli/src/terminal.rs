//! Terminal stand-ins for the page, the map, device geolocation and the
//! payment provider.

use std::cell::Cell;

use lastbite_core::{Bounds, CheckoutSession, GeoPoint, PublishableKey};
use lastbite_widgets::{
    Alerts, CheckoutButton, GeolocationError, Geolocator, LocatorView, MapSurface, MarkerId,
    MarkerKind, MarkerSpec, PaymentProvider, ProviderError, StatSlot, StatSlots,
};

pub(crate) struct TerminalSlots;

impl StatSlots for TerminalSlots {
    fn set_text(&self, slot: StatSlot, text: &str) {
        println!("{:<20} {text}", slot.binding_id());
    }
}

/// Prints map operations instead of drawing them.
#[derive(Default)]
pub(crate) struct TerminalMap {
    next_id: Cell<u64>,
}

impl MapSurface for TerminalMap {
    fn create(&self, center: GeoPoint, zoom: u8) {
        println!(
            "map centered on {:.5}, {:.5} (zoom {zoom})",
            center.latitude, center.longitude
        );
    }

    fn destroy(&self) {
        println!("map closed");
    }

    fn add_marker(&self, marker: &MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let label = match &marker.kind {
            MarkerKind::User => "you".to_owned(),
            MarkerKind::Store(id) => format!("store {id}"),
        };
        println!(
            "marker {label} at {:.5}, {:.5}",
            marker.position.latitude, marker.position.longitude
        );
        if !marker.popup_html.is_empty() {
            println!("  {}", marker.popup_html);
        }
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        tracing::trace!(marker = id.0, "marker removed");
    }

    fn fit_bounds(&self, bounds: &Bounds) {
        println!(
            "viewport {:.5},{:.5} .. {:.5},{:.5}",
            bounds.south_west.latitude,
            bounds.south_west.longitude,
            bounds.north_east.latitude,
            bounds.north_east.longitude
        );
    }
}

pub(crate) struct TerminalView;

impl LocatorView for TerminalView {
    fn set_loading(&self, loading: bool) {
        if loading {
            tracing::info!("loading...");
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn hide_error(&self) {}

    fn set_store_count(&self, label: &str) {
        println!("{label}");
    }
}

/// A device position given on the command line. `None` behaves like a
/// browser without geolocation.
pub(crate) struct FixedPosition(pub Option<GeoPoint>);

impl Geolocator for FixedPosition {
    fn is_supported(&self) -> bool {
        self.0.is_some()
    }

    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        self.0.ok_or(GeolocationError::PositionUnavailable)
    }
}

pub(crate) struct TerminalButton;

impl CheckoutButton for TerminalButton {
    fn set_disabled(&self, disabled: bool) {
        tracing::debug!(disabled, "checkout button");
    }

    fn set_label(&self, label: &str) {
        println!("[{label}]");
    }
}

pub(crate) struct TerminalAlerts;

impl Alerts for TerminalAlerts {
    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}

/// Reports the redirect a browser would perform.
pub(crate) struct ConsoleRedirect {
    key: PublishableKey,
}

impl ConsoleRedirect {
    pub(crate) fn new(key: PublishableKey) -> Self {
        Self { key }
    }
}

impl PaymentProvider for ConsoleRedirect {
    async fn redirect_to_checkout(&self, session: &CheckoutSession) -> Result<(), ProviderError> {
        if session.session_id.is_empty() {
            return Err(ProviderError::new("missing checkout session id"));
        }
        println!(
            "redirecting to hosted checkout with {:?}, session {}",
            self.key, session.session_id
        );
        Ok(())
    }
}
