//! Remote observation catalog: query model, observation records and the
//! trait the proximity resolver talks to.

pub mod inaturalist;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::resolver::SearchPolicy;
use crate::types::{Coordinate, SpeciesId};

pub use inaturalist::INaturalistClient;

/// Failure of a single catalog request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Catalog returned status {0}")]
    Status(u16),

    #[error("Format error: {0}")]
    Format(String),
}

/// Coarse classification of catalog failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorKind {
    /// The request never produced a successful response
    Transport,
    /// A response arrived but could not be understood
    Format,
}

impl CatalogError {
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            Self::Transport(_) | Self::Status(_) => CatalogErrorKind::Transport,
            Self::Format(_) => CatalogErrorKind::Format,
        }
    }
}

/// One observation search: every pending species within `radius_km` of `origin`
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationQuery {
    pub taxa: Vec<SpeciesId>,
    pub origin: Coordinate,
    pub radius_km: u32,
    pub per_page: u32,
    pub geoprivacy: String,
    pub quality_grade: String,
    pub order: String,
    pub order_by: String,
}

impl ObservationQuery {
    pub fn new(
        taxa: Vec<SpeciesId>,
        origin: Coordinate,
        radius_km: u32,
        policy: &SearchPolicy,
    ) -> Self {
        Self {
            taxa,
            origin,
            radius_km,
            per_page: policy.per_page,
            geoprivacy: policy.geoprivacy.clone(),
            quality_grade: policy.quality_grade.clone(),
            order: policy.order.clone(),
            order_by: policy.order_by.clone(),
        }
    }

    /// Comma-joined taxon list as the catalog expects it
    pub fn taxon_list(&self) -> String {
        self.taxa
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Query string parameters in request order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("taxon_id", self.taxon_list()),
            ("geoprivacy", self.geoprivacy.clone()),
            ("quality_grade", self.quality_grade.clone()),
            ("per_page", self.per_page.to_string()),
            ("order", self.order.clone()),
            ("order_by", self.order_by.clone()),
            ("lat", self.origin.latitude.to_string()),
            ("lng", self.origin.longitude.to_string()),
            ("radius", self.radius_km.to_string()),
        ]
    }
}

/// A research-grade observation record
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: Option<u64>,
    pub species: SpeciesId,
    /// `None` when the record's location is missing or malformed
    pub location: Option<Coordinate>,
    pub observed_on: Option<String>,
}

impl Observation {
    pub fn new(species: SpeciesId, location: Option<Coordinate>) -> Self {
        Self {
            id: None,
            species,
            location,
            observed_on: None,
        }
    }

    /// Build from one entry of the catalog's `results` array.
    ///
    /// Records without a usable `taxon.id` cannot be attributed to a species
    /// and yield `None`.
    pub fn from_json(record: &Value) -> Option<Self> {
        let species = record
            .get("taxon")
            .and_then(|taxon| taxon.get("id"))
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
            .filter(|id| *id != 0)
            .map(SpeciesId)?;

        let location = record
            .get("location")
            .and_then(Value::as_str)
            .and_then(Coordinate::parse_location);

        Some(Self {
            id: record.get("id").and_then(Value::as_u64),
            species,
            location,
            observed_on: record
                .get("observed_on")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Source of observation records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObservationCatalog: Send + Sync {
    /// Run one search and return the matching observations
    async fn observations_near(
        &self,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, CatalogError>;
}
