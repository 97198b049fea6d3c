use std::time::Duration;

use lastbite_client::DashboardClient;
use lastbite_core::{Endpoints, RadiusMiles};
use serde_json::json;
use wiremock::matchers::{body_string, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use super::*;
use crate::testing::{point, test_client, FakeGeolocator, FakeLocatorView, FakeMap};

const GEOCODE_PATH: &str = "/dashboard/api/geocode-zipcode/";
const NEARBY_PATH: &str = "/dashboard/api/nearby-businesses/";

type TestLocator = StoreLocator<FakeMap, FakeLocatorView, FakeGeolocator>;

fn locator(server: &MockServer, geolocator: FakeGeolocator) -> TestLocator {
    locator_with_client(test_client(&server.uri()), geolocator)
}

fn locator_with_client(client: DashboardClient, geolocator: FakeGeolocator) -> TestLocator {
    StoreLocator::new(
        client,
        FakeMap::default(),
        FakeLocatorView::default(),
        geolocator,
        "/biz/public/",
        RadiusMiles::default(),
    )
}

fn business(id: i64, latitude: f64, longitude: f64, products: usize) -> serde_json::Value {
    let products: Vec<serde_json::Value> = (0..products)
        .map(|i| json!({ "id": i, "title": format!("Product {i}"), "price": "2.00", "image": null }))
        .collect();
    json!({
        "owner_id": id,
        "business_id": id,
        "owner_name": format!("Store {id}"),
        "owner_username": format!("store{id}"),
        "latitude": latitude,
        "longitude": longitude,
        "address": "1 Main St",
        "city": "Springfield",
        "state": null,
        "zip_code": "62701",
        "distance": 1.5,
        "product_count": products.len(),
        "products": products
    })
}

fn nearby_body(businesses: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "success": true, "count": businesses.len(), "businesses": businesses })
}

fn geocode_ok(latitude: f64, longitude: f64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "latitude": latitude,
        "longitude": longitude
    }))
}

async fn mount_geocode(server: &MockServer, zip: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GEOCODE_PATH))
        .and(body_string(format!("zip_code={zip}")))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_nearby(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// rendering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zip_search_renders_one_marker_per_listing_plus_user() {
    let server = MockServer::start().await;
    mount_geocode(&server, "62701", geocode_ok(39.78, -89.65)).await;
    mount_nearby(
        &server,
        nearby_body(vec![
            business(1, 39.79, -89.64, 1),
            business(2, 39.70, -89.70, 0),
            business(3, 39.85, -89.60, 3),
        ]),
    )
    .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    let rendered = loc.search_zip(" 62701 ").await.expect("search should render");

    assert_eq!(rendered, 3);
    assert_eq!(loc.state(), LocatorState::Rendered);
    assert_eq!(loc.map().store_markers().len(), 3);
    assert_eq!(loc.map().user_markers(), 1);
    assert_eq!(loc.store_marker_count(), 3);
    assert_eq!(loc.view().count.borrow().as_deref(), Some("3 stores"));
    assert!(!loc.view().loading.get());
    assert_eq!(*loc.view().error.borrow(), None);
    assert_eq!(loc.map().created.borrow().as_slice(), &[(point(39.78, -89.65), DEFAULT_ZOOM)]);
}

#[tokio::test]
async fn viewport_is_fitted_around_user_and_stores() {
    let server = MockServer::start().await;
    mount_geocode(&server, "62701", geocode_ok(39.78, -89.65)).await;
    mount_nearby(
        &server,
        nearby_body(vec![business(1, 39.90, -89.50, 0), business(2, 39.70, -89.70, 0)]),
    )
    .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    loc.search_zip("62701").await.unwrap();

    let fitted = loc.map().fitted.borrow().expect("viewport should be fitted");
    for p in [point(39.78, -89.65), point(39.90, -89.50), point(39.70, -89.70)] {
        assert!(fitted.contains(&p), "{p:?} outside {fitted:?}");
    }
    // 10% of the 0.2° span on each side.
    assert!((fitted.north_east.latitude - 39.92).abs() < 1e-9);
    assert!((fitted.south_west.longitude - -89.72).abs() < 1e-9);
}

#[tokio::test]
async fn store_popup_links_to_public_page() {
    let server = MockServer::start().await;
    mount_geocode(&server, "62701", geocode_ok(39.78, -89.65)).await;
    mount_nearby(&server, nearby_body(vec![business(77, 39.79, -89.64, 3)])).await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    loc.search_zip("62701").await.unwrap();

    let markers = loc.map().store_markers();
    assert_eq!(markers[0].kind, MarkerKind::Store(lastbite_core::BusinessId::new("77")));
    assert!(markers[0].popup_html.contains(r#"href="/biz/public/77/""#));
    assert!(markers[0].popup_html.contains("+1 more item"));
    assert!(!markers[0].open_popup);
}

#[tokio::test]
async fn zero_listings_show_empty_state_and_no_store_markers() {
    let server = MockServer::start().await;
    mount_geocode(&server, "62701", geocode_ok(39.78, -89.65)).await;
    mount_nearby(&server, nearby_body(Vec::new())).await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    let rendered = loc.search_zip("62701").await.unwrap();

    assert_eq!(rendered, 0);
    assert!(loc.map().store_markers().is_empty());
    assert_eq!(loc.map().user_markers(), 1);
    assert_eq!(
        loc.view().error.borrow().as_deref(),
        Some("No stores found in this area. Try increasing the search radius.")
    );
    assert_eq!(loc.view().count.borrow().as_deref(), Some("0 stores"));
    assert!(loc.map().fitted.borrow().is_none());
}

// ---------------------------------------------------------------------------
// resolving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_zip_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    let err = loc.search_zip("   ").await.unwrap_err();

    assert!(matches!(err, LocatorError::EmptyZip));
    assert_eq!(loc.view().error.borrow().as_deref(), Some("Please enter a ZIP code"));
    assert_eq!(loc.view().loading_calls.get(), 0);
    assert_eq!(loc.state(), LocatorState::Idle);
}

#[tokio::test]
async fn denied_geolocation_points_user_at_zip_entry() {
    let server = MockServer::start().await;
    let loc = locator(&server, FakeGeolocator::failing(GeolocationError::PermissionDenied));

    let err = loc.detect_location().await.unwrap_err();

    assert!(matches!(err, LocatorError::Geolocation(GeolocationError::PermissionDenied)));
    let error = loc.view().error.borrow().clone().expect("error shown");
    assert!(error.contains("enter a ZIP code"), "unexpected message: {error}");
    assert!(error.contains("enable location access"));
    assert!(!loc.view().loading.get());
    assert!(loc.map().created.borrow().is_empty());
    assert_eq!(loc.state(), LocatorState::Idle);
}

#[tokio::test]
async fn unavailable_position_suggests_zip_search() {
    let server = MockServer::start().await;
    let loc = locator(&server, FakeGeolocator::failing(GeolocationError::Timeout));

    loc.detect_location().await.unwrap_err();

    assert_eq!(
        loc.view().error.borrow().as_deref(),
        Some("Unable to detect location. Please enter a ZIP code to search.")
    );
}

#[tokio::test]
async fn unsupported_geolocation_never_asks_for_position() {
    let server = MockServer::start().await;
    let loc = locator(&server, FakeGeolocator::unsupported());

    let err = loc.on_page_load().await.unwrap_err();

    assert!(matches!(err, LocatorError::GeolocationUnsupported));
    assert_eq!(loc.geolocator.calls.get(), 0);
    assert!(loc.view().error.borrow().as_deref().unwrap().contains("ZIP code"));
}

#[tokio::test]
async fn detected_position_opens_map_and_loads_stores() {
    let server = MockServer::start().await;
    mount_nearby(&server, nearby_body(vec![business(1, 40.01, -75.01, 0)])).await;

    let loc = locator(&server, FakeGeolocator::at(point(40.0, -75.0)));
    let rendered = loc.on_page_load().await.unwrap();

    assert_eq!(rendered, 1);
    assert_eq!(loc.center(), Some(point(40.0, -75.0)));
    assert_eq!(loc.view().count.borrow().as_deref(), Some("1 store"));
}

#[tokio::test]
async fn zip_rejection_shows_backend_message() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "00000",
        ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Zip code not found"
        })),
    )
    .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    let err = loc.search_zip("00000").await.unwrap_err();

    assert!(matches!(err, LocatorError::Geocode(_)));
    assert_eq!(loc.view().error.borrow().as_deref(), Some("Zip code not found"));
    assert!(!loc.view().loading.get());
    assert!(loc.map().created.borrow().is_empty());
    assert_eq!(loc.state(), LocatorState::Idle);
}

#[tokio::test]
async fn zip_error_status_hides_backend_text() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "00000",
        ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Zip code not found"
        })),
    )
    .await;
    mount_geocode(
        &server,
        "10001",
        ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "Geocoding failed: HTTPSConnectionPool(host='nominatim.openstreetmap.org', port=443): Read timed out."
        })),
    )
    .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    for zip in ["00000", "10001"] {
        let err = loc.search_zip(zip).await.unwrap_err();

        assert!(matches!(err, LocatorError::Geocode(_)), "got {err:?}");
        assert_eq!(
            loc.view().error.borrow().as_deref(),
            Some("Failed to search ZIP code. Please try again.")
        );
        assert!(!loc.view().loading.get());
        assert!(loc.map().created.borrow().is_empty());
        assert_eq!(loc.state(), LocatorState::Idle);
    }
}

#[tokio::test]
async fn zip_rejection_without_message_uses_fallback() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "99999",
        ResponseTemplate::new(200).set_body_json(json!({ "success": false })),
    )
    .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    loc.search_zip("99999").await.unwrap_err();

    assert_eq!(loc.view().error.borrow().as_deref(), Some("ZIP code not found"));
}

#[tokio::test]
async fn zip_transport_failure_shows_generic_message() {
    let server = MockServer::start().await;
    mount_geocode(&server, "62701", ResponseTemplate::new(500)).await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    loc.search_zip("62701").await.unwrap_err();

    assert_eq!(
        loc.view().error.borrow().as_deref(),
        Some("Failed to search ZIP code. Please try again.")
    );
    assert!(!loc.view().loading.get());
}

#[tokio::test]
async fn missing_geocode_endpoint_is_a_configuration_error() {
    let server = MockServer::start().await;
    let endpoints = Endpoints {
        geocode: None,
        ..Endpoints::default()
    };
    let client = DashboardClient::new(&server.uri(), endpoints, 5, "lastbite-test/0.1").unwrap();
    let loc = locator_with_client(client, FakeGeolocator::unsupported());

    loc.search_zip("62701").await.unwrap_err();

    assert_eq!(
        loc.view().error.borrow().as_deref(),
        Some("Configuration error: Geocode URL not found")
    );
}

#[tokio::test]
async fn enter_key_submits_zip_and_other_keys_do_not() {
    let server = MockServer::start().await;
    mount_geocode(&server, "62701", geocode_ok(39.78, -89.65)).await;
    mount_nearby(&server, nearby_body(Vec::new())).await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    assert!(loc.on_zip_key("6", "62701").await.is_none());
    assert!(loc.map().created.borrow().is_empty());

    let result = loc.on_zip_key("Enter", "62701").await;
    assert!(matches!(result, Some(Ok(0))));
}

// ---------------------------------------------------------------------------
// radius and session replacement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn radius_change_requeries_around_last_point_in_km() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEOCODE_PATH))
        .respond_with(geocode_ok(39.78, -89.65))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("lat", "39.78"))
        .and(query_param("lng", "-89.65"))
        .and(|req: &Request| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == "radius")
                .and_then(|(_, v)| v.parse::<f64>().ok())
                .is_some_and(|km| (km - 25.0 * 1.60934).abs() < 1e-6)
        })
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(nearby_body(vec![business(1, 39.9, -89.9, 0), business(2, 40.0, -90.0, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_nearby(&server, nearby_body(vec![business(1, 39.9, -89.9, 0)])).await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    assert_eq!(loc.search_zip("62701").await.unwrap(), 1);

    let rendered = loc
        .set_radius(RadiusMiles::new(25.0).unwrap())
        .await
        .expect("radius change should re-query");

    assert_eq!(rendered, 2);
    assert_eq!(loc.map().created.borrow().len(), 1, "map must not be re-created");
    assert_eq!(loc.map().store_markers().len(), 2);
    assert_eq!(loc.map().user_markers(), 1);
}

#[tokio::test]
async fn radius_change_while_resolving_applies_to_pending_search() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "62701",
        geocode_ok(39.78, -89.65).set_delay(Duration::from_millis(300)),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(|req: &Request| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == "radius")
                .and_then(|(_, v)| v.parse::<f64>().ok())
                .is_some_and(|km| (km - 25.0 * 1.60934).abs() < 1e-6)
        })
        .respond_with(
            ResponseTemplate::new(200).set_body_json(nearby_body(vec![business(1, 39.9, -89.9, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    let radius = RadiusMiles::new(25.0).unwrap();
    let (searched, changed) = tokio::join!(loc.search_zip("62701"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(loc.state(), LocatorState::Resolving);
        loc.set_radius(radius).await
    });

    assert!(matches!(changed, Err(LocatorError::NoLocation)));
    assert_eq!(searched.unwrap(), 1);
    assert_eq!(loc.radius(), radius);
    assert_eq!(loc.map().created.borrow().len(), 1);
}

#[tokio::test]
async fn radius_change_without_location_only_records_radius() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    let radius = RadiusMiles::new(50.0).unwrap();
    let err = loc.set_radius(radius).await.unwrap_err();

    assert!(matches!(err, LocatorError::NoLocation));
    assert_eq!(loc.radius(), radius);
}

#[tokio::test]
async fn failed_store_query_keeps_previous_markers() {
    let server = MockServer::start().await;
    mount_geocode(&server, "62701", geocode_ok(39.78, -89.65)).await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(nearby_body(vec![business(1, 39.9, -89.9, 0), business(2, 40.0, -90.0, 0)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    loc.search_zip("62701").await.unwrap();
    let err = loc
        .set_radius(RadiusMiles::new(5.0).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, LocatorError::Stores(_)));
    assert_eq!(loc.map().store_markers().len(), 2);
    assert_eq!(loc.view().error.borrow().as_deref(), Some("Failed to load nearby stores"));
    assert!(!loc.view().loading.get());
    assert_eq!(loc.state(), LocatorState::Idle);
}

#[tokio::test]
async fn new_search_discards_previous_map_and_markers() {
    let server = MockServer::start().await;
    mount_geocode(&server, "11111", geocode_ok(10.0, 10.0)).await;
    mount_geocode(&server, "22222", geocode_ok(20.0, 20.0)).await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("lat", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nearby_body(vec![
            business(1, 10.1, 10.1, 0),
            business(2, 10.2, 10.2, 0),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("lat", "20"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(nearby_body(vec![business(3, 20.1, 20.1, 0)])),
        )
        .mount(&server)
        .await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    loc.search_zip("11111").await.unwrap();
    loc.search_zip("22222").await.unwrap();

    assert_eq!(loc.map().created.borrow().len(), 2);
    assert_eq!(loc.map().destroyed.get(), 1);
    assert_eq!(loc.map().user_markers(), 1);
    let stores = loc.map().store_markers();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].position, point(20.1, 20.1));
    assert_eq!(loc.center(), Some(point(20.0, 20.0)));
}

#[tokio::test]
async fn superseded_search_result_is_dropped() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "11111",
        geocode_ok(10.0, 10.0).set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_geocode(&server, "22222", geocode_ok(20.0, 20.0)).await;
    mount_nearby(&server, nearby_body(vec![business(3, 20.1, 20.1, 0)])).await;

    let loc = locator(&server, FakeGeolocator::unsupported());
    let (slow, fast) = tokio::join!(loc.search_zip("11111"), loc.search_zip("22222"));

    assert!(matches!(slow, Err(LocatorError::Superseded)), "got {slow:?}");
    assert_eq!(fast.unwrap(), 1);
    assert_eq!(loc.map().created.borrow().len(), 1);
    assert_eq!(loc.map().current_center(), Some(point(20.0, 20.0)));
    assert_eq!(loc.center(), Some(point(20.0, 20.0)));
    assert_eq!(loc.state(), LocatorState::Rendered);
}

#[tokio::test]
async fn late_geolocation_does_not_override_newer_zip_search() {
    let server = MockServer::start().await;
    mount_geocode(&server, "22222", geocode_ok(20.0, 20.0)).await;
    mount_nearby(&server, nearby_body(Vec::new())).await;

    let geo = FakeGeolocator::with(vec![(Ok(point(10.0, 10.0)), Duration::from_millis(300))]);
    let loc = locator(&server, geo);
    let (detected, searched) = tokio::join!(loc.detect_location(), loc.search_zip("22222"));

    assert!(matches!(detected, Err(LocatorError::Superseded)));
    assert!(searched.is_ok());
    assert_eq!(loc.center(), Some(point(20.0, 20.0)));
}
