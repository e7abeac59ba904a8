//! Seasonal edible-plant dataset: records grouped by ripening month, name
//! search, and the rows presented after distances are resolved.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ForagerError, ForagerResult};
use crate::resolver::{ResolutionResult, SpeciesQuery};
use crate::types::SpeciesId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Month from a 1-based number
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    /// Current month on the local clock
    pub fn current() -> Self {
        Self::from_number(chrono::Local::now().month()).unwrap_or(Month::January)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Month {
    type Err = ForagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|m| {
                let name = m.name().to_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .copied()
            .ok_or_else(|| ForagerError::Parse(format!("Unknown month: {}", s)))
    }
}

/// One row of the edible plants dataset.
///
/// Fields are kept as raw JSON so a single malformed row is dropped on its
/// own instead of failing the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantRecord {
    #[serde(rename = "Month Ripe", default)]
    pub month_ripe: Option<Value>,
    #[serde(rename = "iNaturalist ID", default)]
    pub inaturalist_id: Option<Value>,
    #[serde(rename = "Common Name", default)]
    pub common_name: Option<Value>,
}

impl PlantRecord {
    /// Taxon id if the row carries a positive numeric one
    pub fn species_id(&self) -> Option<SpeciesId> {
        match self.inaturalist_id.as_ref()? {
            Value::Number(n) => n
                .as_u64()
                .and_then(|id| u32::try_from(id).ok())
                .filter(|id| *id != 0)
                .map(SpeciesId),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn month(&self) -> Option<Month> {
        self.month_ripe.as_ref()?.as_str()?.parse().ok()
    }

    /// Display name; empty when the row has none
    pub fn name(&self) -> String {
        self.common_name
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// Read the dataset file: a JSON array of [`PlantRecord`]
pub fn load_plant_records<P: AsRef<Path>>(path: P) -> ForagerResult<Vec<PlantRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ForagerError::NotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| ForagerError::Parse(format!("Failed to parse plant dataset: {}", e)))
}

/// Read a species file: a JSON object mapping taxon id to display name
pub fn load_species_query<P: AsRef<Path>>(path: P) -> ForagerResult<SpeciesQuery> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ForagerError::NotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| ForagerError::Parse(format!("Failed to parse species file: {}", e)))
}

/// Species available per ripening month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonalCalendar {
    by_month: BTreeMap<Month, SpeciesQuery>,
}

impl SeasonalCalendar {
    /// Group records by month; rows without a month or a numeric id are dropped
    pub fn from_records(records: &[PlantRecord]) -> Self {
        let mut by_month: BTreeMap<Month, SpeciesQuery> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            match (record.month(), record.species_id()) {
                (Some(month), Some(id)) => {
                    by_month
                        .entry(month)
                        .or_default()
                        .insert(id, record.name());
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} plant records without month or taxon id", skipped);
        }

        Self { by_month }
    }

    /// Species ripe in `month`; empty when the dataset has none
    pub fn species_for(&self, month: Month) -> SpeciesQuery {
        self.by_month.get(&month).cloned().unwrap_or_default()
    }

    /// Months present in the dataset, in calendar order
    pub fn months(&self) -> Vec<Month> {
        self.by_month.keys().copied().collect()
    }

    pub fn species_count(&self, month: Month) -> usize {
        self.by_month.get(&month).map_or(0, |q| q.len())
    }
}

/// Keep species whose name contains `needle`, ignoring case
pub fn filter_by_name(query: &SpeciesQuery, needle: &str) -> SpeciesQuery {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return query.clone();
    }
    query
        .iter()
        .filter(|(_, name)| name.to_lowercase().contains(&needle))
        .map(|(id, name)| (*id, name.clone()))
        .collect()
}

/// A species paired with its resolved distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesRow {
    pub species: SpeciesId,
    pub name: String,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    /// Keep dataset (id) order
    #[default]
    Id,
    Name,
    /// Nearest first, unknown distances last
    Distance,
}

/// Pair every species in `query` with its entry in `result`
pub fn rows(query: &SpeciesQuery, result: &ResolutionResult) -> Vec<SpeciesRow> {
    query
        .iter()
        .map(|(id, name)| SpeciesRow {
            species: *id,
            name: name.clone(),
            distance_km: result.get(id).copied().flatten(),
        })
        .collect()
}

pub fn sort_rows(rows: &mut [SpeciesRow], order: SortOrder) {
    match order {
        SortOrder::Id => rows.sort_by_key(|r| r.species),
        SortOrder::Name => rows.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.species.cmp(&b.species))
        }),
        SortOrder::Distance => rows.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.total_cmp(&y).then(a.species.cmp(&b.species)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.species.cmp(&b.species),
        }),
    }
}
