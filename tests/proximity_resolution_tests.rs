//! End-to-end proximity resolution against a mock observation catalog

mod common;

use common::*;
use forager::{
    CatalogError, ProximityResolver, ResolutionResult, SearchPolicy, SpeciesId, SpeciesQuery,
};
use pretty_assertions::assert_eq;
use wiremock::{MockServer, ResponseTemplate};

fn species(ids: &[u32]) -> SpeciesQuery {
    ids.iter()
        .map(|id| (SpeciesId(*id), format!("species {}", id)))
        .collect()
}

fn assert_km(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("species should be resolved");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} km, got {} km",
        expected,
        actual
    );
}

#[tokio::test]
async fn test_minimum_distance_per_species() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        2,
        vec![
            observation_at_km(101, 5.2),
            observation_at_km(101, 1.8),
            observation_at_km(101, 9.0),
        ],
        1,
    )
    .await;

    let resolver = ProximityResolver::new(client_for(&server));
    let result = resolver
        .resolve_minimum_distances(&species(&[101]), 0.0, 0.0)
        .await;

    assert_eq!(result.len(), 1);
    assert_km(result[&SpeciesId(101)], 1.8);
}

#[tokio::test]
async fn test_empty_query_makes_no_request() {
    let server = MockServer::start().await;

    let resolver = ProximityResolver::new(client_for(&server));
    let result = resolver
        .resolve_minimum_distances(&SpeciesQuery::new(), 0.0, 0.0)
        .await;

    assert!(result.is_empty());
    assert!(requested_radii(&server).await.is_empty());
}

#[tokio::test]
async fn test_species_first_seen_at_radius_eight() {
    let server = MockServer::start().await;
    mount_page(&server, 2, vec![observation_at_km(1, 0.5)], 1).await;
    mount_page(&server, 4, vec![], 1).await;
    mount_page(&server, 8, vec![observation_at_km(2, 6.5)], 1).await;
    mount_page(&server, 16, vec![], 0).await;
    mount_page(&server, 32, vec![], 0).await;

    let resolver = ProximityResolver::new(client_for(&server));
    let resolution = resolver.resolve(&species(&[1, 2]), origin()).await;

    assert_km(resolution.distances[&SpeciesId(1)], 0.5);
    assert_km(resolution.distances[&SpeciesId(2)], 6.5);
    assert_eq!(requested_radii(&server).await, vec![2, 4, 8]);

    // Only the species still pending is asked for after the first pass
    let requests = server.received_requests().await.unwrap();
    let taxa: Vec<String> = requests
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "taxon_id")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(taxa, vec!["1,2", "2", "2"]);
}

#[tokio::test]
async fn test_radius_cap_leaves_species_unresolved() {
    let server = MockServer::start().await;
    for radius in [2, 4, 8, 16, 32] {
        mount_page(&server, radius, vec![], 1).await;
    }
    mount_page(&server, 64, vec![], 0).await;

    let resolver = ProximityResolver::new(client_for(&server));
    let result = resolver
        .resolve_minimum_distances(&species(&[7, 8]), 0.0, 0.0)
        .await;

    let expected: ResolutionResult = [(SpeciesId(7), None), (SpeciesId(8), None)]
        .into_iter()
        .collect();
    assert_eq!(result, expected);
    assert_eq!(requested_radii(&server).await, vec![2, 4, 8, 16, 32]);
}

#[tokio::test]
async fn test_server_error_keeps_partial_results() {
    let server = MockServer::start().await;
    mount_page(&server, 2, vec![observation_at_km(1, 1.0)], 1).await;
    mount_response(&server, 4, ResponseTemplate::new(500), 1).await;
    mount_page(&server, 8, vec![observation_at_km(2, 7.0)], 0).await;

    let resolver = ProximityResolver::new(client_for(&server));
    let resolution = resolver.resolve(&species(&[1, 2, 3]), origin()).await;

    assert_km(resolution.distances[&SpeciesId(1)], 1.0);
    assert_eq!(resolution.distances[&SpeciesId(2)], None);
    assert_eq!(resolution.distances[&SpeciesId(3)], None);
    assert_eq!(resolution.aborted, Some(CatalogError::Status(500)));
    assert_eq!(requested_radii(&server).await, vec![2, 4]);
}

#[tokio::test]
async fn test_non_json_response_aborts_run() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        2,
        ResponseTemplate::new(200).set_body_raw("rate limited", "text/plain"),
        1,
    )
    .await;
    mount_page(&server, 4, vec![], 0).await;

    let resolver = ProximityResolver::new(client_for(&server));
    let result = resolver
        .resolve_minimum_distances(&species(&[1]), 0.0, 0.0)
        .await;

    assert_eq!(result.len(), 1);
    assert_eq!(result[&SpeciesId(1)], None);
}

#[tokio::test]
async fn test_malformed_location_is_skipped() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        2,
        vec![
            observation(1, "not-a-coordinate"),
            observation_at_km(2, 1.5),
        ],
        1,
    )
    .await;
    mount_page(&server, 4, vec![observation_at_km(1, 3.0)], 1).await;

    let resolver = ProximityResolver::new(client_for(&server));
    let resolution = resolver.resolve(&species(&[1, 2]), origin()).await;

    assert_km(resolution.distances[&SpeciesId(1)], 3.0);
    assert_km(resolution.distances[&SpeciesId(2)], 1.5);
    assert!(resolution.aborted.is_none());
}

#[tokio::test]
async fn test_co_located_observation_resolves_to_zero() {
    let server = MockServer::start().await;
    mount_page(&server, 2, vec![observation(5, "0,0")], 1).await;
    mount_page(&server, 4, vec![], 0).await;

    let resolver = ProximityResolver::new(client_for(&server));
    let result = resolver
        .resolve_minimum_distances(&species(&[5]), 0.0, 0.0)
        .await;

    assert_eq!(result[&SpeciesId(5)], Some(0.0));
}

#[tokio::test]
async fn test_replayed_responses_are_deterministic() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        2,
        vec![observation_at_km(3, 1.25), observation_at_km(4, 0.75)],
        2,
    )
    .await;
    mount_page(&server, 4, vec![observation_at_km(5, 3.5)], 2).await;
    for radius in [8, 16, 32] {
        mount_page(&server, radius, vec![], 2).await;
    }

    let resolver = ProximityResolver::new(client_for(&server));
    let query = species(&[3, 4, 5, 6]);
    let first = resolver.resolve_minimum_distances(&query, 0.0, 0.0).await;
    let second = resolver.resolve_minimum_distances(&query, 0.0, 0.0).await;

    assert_eq!(first, second);
    assert_eq!(first.keys().copied().collect::<Vec<_>>(), query.keys().copied().collect::<Vec<_>>());
    assert_eq!(first[&SpeciesId(6)], None);
}

#[tokio::test]
async fn test_custom_policy_schedule() {
    let server = MockServer::start().await;
    mount_page(&server, 10, vec![], 1).await;
    mount_page(&server, 20, vec![], 1).await;
    mount_page(&server, 40, vec![], 0).await;

    let policy = SearchPolicy {
        initial_radius_km: 10,
        max_radius_km: 25,
        ..SearchPolicy::default()
    };
    let resolver = ProximityResolver::with_policy(client_for(&server), policy).unwrap();
    let resolution = resolver.resolve(&species(&[1]), origin()).await;

    assert_eq!(resolution.passes.len(), 2);
    assert_eq!(resolution.unresolved(), vec![SpeciesId(1)]);
}
