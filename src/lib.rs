pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod plants;
pub mod resolver;
pub mod types;

pub use crate::catalog::{CatalogError, INaturalistClient, Observation, ObservationCatalog, ObservationQuery};
pub use crate::config::{load_config, save_config, Config};
pub use crate::error::{ForagerError, ForagerResult};
pub use crate::geo::{distance_km, EARTH_RADIUS_KM};
pub use crate::resolver::{ProximityResolver, Resolution, ResolutionResult, SearchPolicy, SpeciesQuery};
pub use crate::types::{Coordinate, SpeciesId};

/// Version information for Forager
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
