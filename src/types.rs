//! Identifier and coordinate types shared by the resolver, the catalog client
//! and the seasonal dataset.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ForagerError, ForagerResult};

/// Catalog taxon identifier of a species - newtype pattern for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u32);

impl SpeciesId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

// Zero is not a catalog taxon, so it is rejected wherever ids are read
impl<'de> Deserialize<'de> for SpeciesId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = u32::deserialize(deserializer)?;
        if id == 0 {
            return Err(serde::de::Error::custom("species id must be positive"));
        }
        Ok(Self(id))
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpeciesId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<SpeciesId> for u32 {
    fn from(species: SpeciesId) -> Self {
        species.0
    }
}

impl FromStr for SpeciesId {
    type Err = ForagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u32 = s
            .trim()
            .parse()
            .map_err(|_| ForagerError::Parse(format!("Invalid species id '{}'", s)))?;
        if id == 0 {
            return Err(ForagerError::Parse("Species id must be positive".to_string()));
        }
        Ok(Self(id))
    }
}

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> ForagerResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ForagerError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForagerError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse the catalog's `"lat,lng"` location string.
    ///
    /// Returns `None` for anything that is not exactly two in-range numbers.
    pub fn parse_location(location: &str) -> Option<Self> {
        let mut parts = location.split(',');
        let lat = parts.next()?.trim().parse::<f64>().ok()?;
        let lng = parts.next()?.trim().parse::<f64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Self::new(lat, lng).ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
