//! Recording fakes for the page, map, geolocation and payment seams.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use lastbite_client::DashboardClient;
use lastbite_core::{Bounds, CheckoutSession, Endpoints, GeoPoint};

use crate::checkout::{Alerts, CheckoutButton, PaymentProvider, ProviderError};
use crate::locator::{
    GeolocationError, Geolocator, LocatorView, MapSurface, MarkerId, MarkerKind, MarkerSpec,
};
use crate::stats_panel::{StatSlot, StatSlots};

pub(crate) fn test_client(base_url: &str) -> DashboardClient {
    DashboardClient::new(base_url, Endpoints::default(), 5, "lastbite-test/0.1")
        .expect("client construction should not fail")
        .with_cookies(Some("csrftoken=tok123".to_owned()), "csrftoken")
}

pub(crate) fn point(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint::new(latitude, longitude).expect("valid test coordinates")
}

// ---------------------------------------------------------------------------
// map
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct FakeMap {
    next_id: Cell<u64>,
    pub created: RefCell<Vec<(GeoPoint, u8)>>,
    pub destroyed: Cell<u32>,
    pub live: RefCell<Vec<(MarkerId, MarkerSpec)>>,
    pub fitted: RefCell<Option<Bounds>>,
}

impl FakeMap {
    pub fn store_markers(&self) -> Vec<MarkerSpec> {
        self.live
            .borrow()
            .iter()
            .filter(|(_, m)| matches!(m.kind, MarkerKind::Store(_)))
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn user_markers(&self) -> usize {
        self.live
            .borrow()
            .iter()
            .filter(|(_, m)| m.kind == MarkerKind::User)
            .count()
    }

    pub fn current_center(&self) -> Option<GeoPoint> {
        self.created.borrow().last().map(|(c, _)| *c)
    }
}

impl MapSurface for FakeMap {
    fn create(&self, center: GeoPoint, zoom: u8) {
        self.created.borrow_mut().push((center, zoom));
    }

    fn destroy(&self) {
        self.destroyed.set(self.destroyed.get() + 1);
        self.live.borrow_mut().clear();
    }

    fn add_marker(&self, marker: &MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.live.borrow_mut().push((id, marker.clone()));
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        self.live.borrow_mut().retain(|(live, _)| *live != id);
    }

    fn fit_bounds(&self, bounds: &Bounds) {
        *self.fitted.borrow_mut() = Some(*bounds);
    }
}

// ---------------------------------------------------------------------------
// locator view
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct FakeLocatorView {
    pub loading: Cell<bool>,
    pub loading_calls: Cell<u32>,
    pub error: RefCell<Option<String>>,
    pub count: RefCell<Option<String>>,
}

impl LocatorView for FakeLocatorView {
    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
        self.loading_calls.set(self.loading_calls.get() + 1);
    }

    fn show_error(&self, message: &str) {
        *self.error.borrow_mut() = Some(message.to_owned());
    }

    fn hide_error(&self) {
        *self.error.borrow_mut() = None;
    }

    fn set_store_count(&self, label: &str) {
        *self.count.borrow_mut() = Some(label.to_owned());
    }
}

// ---------------------------------------------------------------------------
// geolocation
// ---------------------------------------------------------------------------

pub(crate) struct FakeGeolocator {
    pub supported: bool,
    pub outcomes: RefCell<Vec<(Result<GeoPoint, GeolocationError>, Duration)>>,
    pub calls: Cell<u32>,
}

impl FakeGeolocator {
    pub fn at(position: GeoPoint) -> Self {
        Self::with(vec![(Ok(position), Duration::ZERO)])
    }

    pub fn failing(err: GeolocationError) -> Self {
        Self::with(vec![(Err(err), Duration::ZERO)])
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::with(Vec::new())
        }
    }

    /// Answers successive calls in order; the last outcome repeats.
    pub fn with(outcomes: Vec<(Result<GeoPoint, GeolocationError>, Duration)>) -> Self {
        Self {
            supported: true,
            outcomes: RefCell::new(outcomes),
            calls: Cell::new(0),
        }
    }
}

impl Geolocator for FakeGeolocator {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        self.calls.set(self.calls.get() + 1);
        let (outcome, delay) = {
            let mut outcomes = self.outcomes.borrow_mut();
            if outcomes.len() > 1 {
                outcomes.remove(0)
            } else {
                outcomes
                    .first()
                    .cloned()
                    .unwrap_or((Err(GeolocationError::PositionUnavailable), Duration::ZERO))
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// stats slots
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct FakeSlots {
    pub values: RefCell<Vec<(StatSlot, String)>>,
}

impl FakeSlots {
    pub fn seeded(values: &[(StatSlot, &str)]) -> Self {
        Self {
            values: RefCell::new(values.iter().map(|(s, v)| (*s, (*v).to_owned())).collect()),
        }
    }

    pub fn get(&self, slot: StatSlot) -> Option<String> {
        self.values
            .borrow()
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, v)| v.clone())
    }
}

impl StatSlots for FakeSlots {
    fn set_text(&self, slot: StatSlot, text: &str) {
        let mut values = self.values.borrow_mut();
        match values.iter_mut().find(|(s, _)| *s == slot) {
            Some(entry) => text.clone_into(&mut entry.1),
            None => values.push((slot, text.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// checkout
// ---------------------------------------------------------------------------

pub(crate) struct FakeButton {
    pub disabled: Cell<bool>,
    pub label: RefCell<String>,
    pub history: RefCell<Vec<String>>,
}

impl FakeButton {
    pub fn new(label: &str) -> Self {
        Self {
            disabled: Cell::new(false),
            label: RefCell::new(label.to_owned()),
            history: RefCell::new(Vec::new()),
        }
    }
}

impl CheckoutButton for FakeButton {
    fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    fn set_label(&self, label: &str) {
        label.clone_into(&mut self.label.borrow_mut());
        self.history.borrow_mut().push(label.to_owned());
    }
}

#[derive(Default)]
pub(crate) struct FakeAlerts {
    pub shown: RefCell<Vec<String>>,
}

impl Alerts for FakeAlerts {
    fn alert(&self, message: &str) {
        self.shown.borrow_mut().push(message.to_owned());
    }
}

#[derive(Default)]
pub(crate) struct FakeProvider {
    pub fail_with: Option<String>,
    pub redirects: RefCell<Vec<String>>,
}

impl PaymentProvider for FakeProvider {
    async fn redirect_to_checkout(&self, session: &CheckoutSession) -> Result<(), ProviderError> {
        self.redirects.borrow_mut().push(session.session_id.clone());
        match &self.fail_with {
            Some(message) => Err(ProviderError::new(message.clone())),
            None => Ok(()),
        }
    }
}
