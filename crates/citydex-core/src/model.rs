// crates/citydex-core/src/model.rs

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::text::{fold_key, starts_with_letter};

/// Raw city record as it comes from the upstream JSON dataset:
///
/// ```json
/// { "country": "UA", "name": "Hurzuf", "_id": 707860,
///   "coord": { "lon": 34.283333, "lat": 44.549999 } }
/// ```
///
/// NOTE: This type mirrors the external dataset. We do *not* expose it as the
/// domain model; [`CityRecord::into_city`] validates and converts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub country: String,
    pub coord: CoordinateRecord,
}

/// Raw coordinate pair from the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateRecord {
    pub lat: f64,
    pub lon: f64,
}

impl CityRecord {
    /// Validate and convert into the domain [`City`].
    ///
    /// Returns `None` for records a well-formed dataset should not contain:
    /// empty names and out-of-range coordinates. Callers skip those rather
    /// than aborting the whole load.
    pub fn into_city(self) -> Option<City> {
        if self.name.is_empty() {
            return None;
        }
        if !(-90.0..=90.0).contains(&self.coord.lat) || !(-180.0..=180.0).contains(&self.coord.lon)
        {
            return None;
        }
        Some(City {
            id: self.id,
            name: self.name,
            country: self.country,
            coord: Coordinate {
                latitude: self.coord.lat,
                longitude: self.coord.lon,
            },
        })
    }
}

/// A city in the catalog.
///
/// Identity is the upstream-assigned `id`: equality and hashing ignore every
/// other field, so two records with the same id are the same city. Constructed
/// once from a decoded [`CityRecord`] and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    /// Short country code, e.g. "US".
    pub country: String,
    pub coord: Coordinate,
}

impl City {
    /// "Name, CC" label used by list output.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Catalog display order: letter-initial names first, then
    /// case-insensitive lexicographic by name.
    ///
    /// A name starting with a digit, symbol or emoji sorts after all
    /// letter-initial names regardless of code point order.
    pub fn display_order(&self, other: &City) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }

    pub(crate) fn sort_key(&self) -> (u8, String) {
        let rank = if starts_with_letter(&self.name) { 0 } else { 1 };
        (rank, fold_key(&self.name))
    }
}

impl PartialEq for City {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for City {}

impl Hash for City {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A geographic coordinate. Storage only — no distance math lives here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}
