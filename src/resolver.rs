//! Proximity resolution: distance from an origin to the nearest qualifying
//! observation of each requested species, found by an expanding-radius search.
//!
//! Each pass queries the catalog for the species still pending at the current
//! radius, commits the per-species minimum distance seen in that response, and
//! doubles the radius for whatever is left. A species resolved in one pass is
//! never queried again. The run stops when nothing is pending or the radius
//! exceeds the cap; a failed request ends the run early and keeps what was
//! already found.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, Observation, ObservationCatalog, ObservationQuery};
use crate::error::{ForagerError, ForagerResult};
use crate::geo::distance_km;
use crate::types::{Coordinate, SpeciesId};

/// Species to resolve, keyed by id. Names are carried for callers only.
pub type SpeciesQuery = BTreeMap<SpeciesId, String>;

/// Nearest observation distance in kilometers per species; `None` = unresolved
pub type ResolutionResult = BTreeMap<SpeciesId, Option<f64>>;

/// Search radius schedule and catalog filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPolicy {
    #[serde(default = "default_initial_radius_km")]
    pub initial_radius_km: u32,
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_geoprivacy")]
    pub geoprivacy: String,
    #[serde(default = "default_quality_grade")]
    pub quality_grade: String,
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default = "default_order_by")]
    pub order_by: String,
}

fn default_initial_radius_km() -> u32 { 2 }
fn default_max_radius_km() -> u32 { 32 }
fn default_per_page() -> u32 { 200 }
fn default_geoprivacy() -> String { "open".to_string() }
fn default_quality_grade() -> String { "research".to_string() }
fn default_order() -> String { "desc".to_string() }
fn default_order_by() -> String { "observed_on".to_string() }

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            initial_radius_km: default_initial_radius_km(),
            max_radius_km: default_max_radius_km(),
            per_page: default_per_page(),
            geoprivacy: default_geoprivacy(),
            quality_grade: default_quality_grade(),
            order: default_order(),
            order_by: default_order_by(),
        }
    }
}

impl SearchPolicy {
    /// Reject schedules that would never terminate or never query
    pub fn validate(&self) -> ForagerResult<()> {
        if self.initial_radius_km == 0 {
            return Err(ForagerError::Configuration(
                "initial_radius_km must be at least 1".to_string(),
            ));
        }
        if self.max_radius_km < self.initial_radius_km {
            return Err(ForagerError::Configuration(format!(
                "max_radius_km ({}) is below initial_radius_km ({})",
                self.max_radius_km, self.initial_radius_km
            )));
        }
        if self.per_page == 0 {
            return Err(ForagerError::Configuration(
                "per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Radii the resolver will try, in order
    pub fn radii(&self) -> Vec<u32> {
        let mut radii = Vec::new();
        let mut radius = self.initial_radius_km;
        while radius != 0 && radius <= self.max_radius_km {
            radii.push(radius);
            match radius.checked_mul(2) {
                Some(next) => radius = next,
                None => break,
            }
        }
        radii
    }
}

/// What happened in one catalog pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    pub radius_km: u32,
    /// Species included in the query
    pub requested: usize,
    /// Observations returned by the catalog
    pub observations: usize,
    /// Species resolved by this pass
    pub resolved: usize,
}

/// Outcome of one resolution run
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// One entry per requested species
    pub distances: ResolutionResult,
    pub passes: Vec<PassSummary>,
    /// The catalog failure that ended the run early, if any
    pub aborted: Option<CatalogError>,
}

impl Resolution {
    fn empty() -> Self {
        Self {
            distances: ResolutionResult::new(),
            passes: Vec::new(),
            aborted: None,
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.distances.values().filter(|d| d.is_some()).count()
    }

    pub fn unresolved(&self) -> Vec<SpeciesId> {
        self.distances
            .iter()
            .filter(|(_, d)| d.is_none())
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Minimum distance from `origin` per pending species among `observations`.
///
/// Observations of species outside `pending`, or without a coordinate, are
/// ignored. A distance of zero is a valid minimum.
pub fn nearest_per_species(
    observations: &[Observation],
    pending: &BTreeSet<SpeciesId>,
    origin: Coordinate,
) -> BTreeMap<SpeciesId, f64> {
    let mut nearest: BTreeMap<SpeciesId, f64> = BTreeMap::new();

    for observation in observations {
        if !pending.contains(&observation.species) {
            continue;
        }
        let Some(location) = observation.location else {
            continue;
        };

        let distance = distance_km(origin, location);
        nearest
            .entry(observation.species)
            .and_modify(|current| {
                if distance < *current {
                    *current = distance;
                }
            })
            .or_insert(distance);
    }

    nearest
}

/// Expanding-radius resolver over an observation catalog
pub struct ProximityResolver<C: ObservationCatalog> {
    catalog: C,
    policy: SearchPolicy,
}

impl<C: ObservationCatalog> ProximityResolver<C> {
    /// Resolver with the default 2..=32 km schedule
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            policy: SearchPolicy::default(),
        }
    }

    pub fn with_policy(catalog: C, policy: SearchPolicy) -> ForagerResult<Self> {
        policy.validate()?;
        Ok(Self { catalog, policy })
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Resolve nearest distances from raw origin degrees.
    ///
    /// Never fails: an invalid origin leaves every species unresolved without
    /// contacting the catalog.
    pub async fn resolve_minimum_distances(
        &self,
        query: &SpeciesQuery,
        origin_lat: f64,
        origin_lng: f64,
    ) -> ResolutionResult {
        match Coordinate::new(origin_lat, origin_lng) {
            Ok(origin) => self.resolve(query, origin).await.distances,
            Err(e) => {
                warn!("Skipping proximity resolution: {}", e);
                query.keys().map(|id| (*id, None)).collect()
            }
        }
    }

    /// Run the full expanding-radius search and report each pass
    pub async fn resolve(&self, query: &SpeciesQuery, origin: Coordinate) -> Resolution {
        let mut resolution = Resolution::empty();
        if query.is_empty() {
            return resolution;
        }

        let mut pending: BTreeSet<SpeciesId> = query.keys().copied().collect();

        for radius in self.policy.radii() {
            if pending.is_empty() {
                break;
            }

            let request = ObservationQuery::new(
                pending.iter().copied().collect(),
                origin,
                radius,
                &self.policy,
            );

            let observations = match self.catalog.observations_near(&request).await {
                Ok(observations) => observations,
                Err(e) => {
                    warn!(
                        radius_km = radius,
                        pending = pending.len(),
                        "Catalog request failed, keeping partial results: {}",
                        e
                    );
                    resolution.aborted = Some(e);
                    break;
                }
            };

            let nearest = nearest_per_species(&observations, &pending, origin);
            for (species, distance) in &nearest {
                pending.remove(species);
                resolution.distances.insert(*species, Some(*distance));
            }

            debug!(
                radius_km = radius,
                observations = observations.len(),
                resolved = nearest.len(),
                remaining = pending.len(),
                "Completed proximity pass"
            );

            resolution.passes.push(PassSummary {
                radius_km: radius,
                requested: request.taxa.len(),
                observations: observations.len(),
                resolved: nearest.len(),
            });
        }

        for species in pending {
            resolution.distances.insert(species, None);
        }

        info!(
            species = query.len(),
            resolved = resolution.resolved_count(),
            passes = resolution.passes.len(),
            "Proximity resolution finished"
        );

        resolution
    }
}
