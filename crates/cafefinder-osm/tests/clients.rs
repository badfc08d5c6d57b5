//! Integration tests for the Overpass and Nominatim clients using wiremock.

use cafefinder_core::{AddressLookup, Coordinate, ElementKind, PoiSource, Radius};
use cafefinder_osm::{build_cafe_query, NominatimClient, OsmError, OverpassClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn center() -> Coordinate {
    Coordinate::new(19.076, 72.8777).expect("valid center")
}

fn overpass(server: &MockServer) -> OverpassClient {
    OverpassClient::with_base_url(&format!("{}/api/interpreter", server.uri()), "cafefinder-test", 5)
        .expect("client construction should not fail")
}

fn nominatim(server: &MockServer) -> NominatimClient {
    NominatimClient::with_base_url(&format!("{}/search", server.uri()), "cafefinder-test", 5)
        .expect("client construction should not fail")
}

// ---------------------------------------------------------------------------
// Overpass
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overpass_returns_nodes_and_centered_ways() {
    let server = MockServer::start().await;
    let radius = Radius::new(1500).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .and(query_param("data", build_cafe_query(center(), radius)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": 0.6,
            "elements": [
                { "type": "node", "id": 1, "lat": 19.08, "lon": 72.88, "tags": { "name": "A" } },
                { "type": "way", "id": 2, "center": { "lat": 19.077, "lon": 72.878 },
                  "tags": { "name": "B", "addr:street": "Hill Road" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let elements = overpass(&server)
        .cafes_around(center(), radius)
        .await
        .expect("should parse elements");

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].kind, ElementKind::Node);
    assert_eq!(elements[1].kind, ElementKind::Way);
    assert_eq!(elements[1].tag("addr:street"), Some("Hill Road"));
    assert!(elements[1].position().is_some());
}

#[tokio::test]
async fn overpass_missing_elements_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": 0.6 })))
        .mount(&server)
        .await;

    let elements = overpass(&server)
        .fetch_cafes(center(), Radius::default())
        .await
        .expect("absent elements should be treated as empty");
    assert!(elements.is_empty());
}

#[tokio::test]
async fn overpass_non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(504).set_body_string("gateway timeout"))
        .mount(&server)
        .await;

    let result = overpass(&server).fetch_cafes(center(), Radius::default()).await;
    assert!(
        matches!(result, Err(OsmError::UnexpectedStatus { status: 504, .. })),
        "expected UnexpectedStatus(504), got: {result:?}"
    );
}

#[tokio::test]
async fn overpass_malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let result = overpass(&server).fetch_cafes(center(), Radius::default()).await;
    assert!(
        matches!(result, Err(OsmError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Nominatim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nominatim_returns_first_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Bandra West"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "19.0596", "lon": "72.8295", "display_name": "Bandra West, Mumbai" }
        ])))
        .mount(&server)
        .await;

    let coord = nominatim(&server)
        .lookup("Bandra West")
        .await
        .expect("lookup should succeed")
        .expect("one match expected");
    assert!((coord.lat() - 19.0596).abs() < 1e-9);
    assert!((coord.lon() - 72.8295).abs() < 1e-9);
}

#[tokio::test]
async fn nominatim_empty_list_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = nominatim(&server).search("nowhere at all").await;
    assert!(matches!(result, Ok(None)), "got: {result:?}");
}

#[tokio::test]
async fn nominatim_server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = nominatim(&server).search("Mumbai").await;
    assert!(
        matches!(result, Err(OsmError::UnexpectedStatus { status: 503, .. })),
        "got: {result:?}"
    );
}
