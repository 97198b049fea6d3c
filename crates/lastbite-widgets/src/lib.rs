//! The dashboard's front-end flows: stats panel, store locator and
//! checkout redirect.
//!
//! Each flow is written against small traits standing in for the page
//! (DOM slots, buttons, alerts), the map library, the device geolocation
//! capability and the hosted payment provider. Everything runs on one
//! thread: handlers take `&self` and suspend only at their `.await`
//! points, so overlapping handlers interleave but never run in parallel.

pub mod checkout;
pub mod locator;
pub mod stats_panel;

#[cfg(test)]
pub(crate) mod testing;

pub use checkout::{
    Alerts, CheckoutButton, CheckoutError, CheckoutRedirect, PaymentProvider, ProviderError,
};
pub use locator::{
    Geolocator, GeolocationError, LocatorError, LocatorState, LocatorView, MapSurface, MarkerId,
    MarkerKind, MarkerSpec, StoreLocator, StorePopup,
};
pub use stats_panel::{StatSlot, StatSlots, StatsPanel};
