//! Shared helpers for catalog and resolver integration tests
//!
//! Observations are placed due east of the origin on the equator so that the
//! expected haversine distance is exact up to rounding.
#![allow(dead_code)]

use forager::{Coordinate, INaturalistClient, EARTH_RADIUS_KM};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OBSERVATIONS_PATH: &str = "/v1/observations";

pub fn origin() -> Coordinate {
    Coordinate::new(0.0, 0.0).unwrap()
}

/// Location string for a point `km` east of the origin
pub fn location_at_km(km: f64) -> String {
    let lng = (km / EARTH_RADIUS_KM).to_degrees();
    format!("0,{}", lng)
}

pub fn observation(taxon_id: u32, location: &str) -> Value {
    json!({
        "id": 1000 + taxon_id as u64,
        "observed_on": "2024-06-15",
        "quality_grade": "research",
        "taxon": { "id": taxon_id },
        "location": location
    })
}

pub fn observation_at_km(taxon_id: u32, km: f64) -> Value {
    observation(taxon_id, &location_at_km(km))
}

pub fn page(results: Vec<Value>) -> Value {
    json!({
        "total_results": results.len(),
        "page": 1,
        "per_page": 200,
        "results": results
    })
}

pub fn client_for(server: &MockServer) -> INaturalistClient {
    INaturalistClient::new()
        .expect("Failed to build client")
        .with_base_url(server.uri())
}

/// Mount a JSON page served only for the given radius
pub async fn mount_page(server: &MockServer, radius: u32, results: Vec<Value>, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(OBSERVATIONS_PATH))
        .and(query_param("radius", radius.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(results)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount an arbitrary response for the given radius
pub async fn mount_response(
    server: &MockServer,
    radius: u32,
    response: ResponseTemplate,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(OBSERVATIONS_PATH))
        .and(query_param("radius", radius.to_string()))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Radii of the requests the server has seen, in arrival order
pub async fn requested_radii(server: &MockServer) -> Vec<u32> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|req| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == "radius")
                .and_then(|(_, v)| v.parse().ok())
        })
        .collect()
}
