//! Postcode resolution and distance math.

pub mod distance;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::dataset::{self, DatasetError};
use super::domain::GeoPoint;

/// Capability resolving a postal code to a location.
pub trait GeoResolver: Send + Sync {
    fn resolve(&self, postcode: &str) -> Result<GeoPoint, GeoError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("unknown postcode: {0}")]
    UnknownPostcode(String),
}

/// Strip every whitespace character, so `"0 150"` and `"0150"` resolve alike.
pub fn normalize_postcode(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, Clone, PartialEq)]
struct PostcodeEntry {
    lat: f64,
    lng: f64,
    municipality: String,
    region: String,
}

#[derive(Debug, Deserialize)]
struct PostcodeRow {
    postcode: String,
    lat: f64,
    lng: f64,
    municipality: String,
    region: String,
}

/// Static postcode table.
///
/// [`PostcodeDirectory::norway`] is the built-in fixture table; deployments load a full
/// dataset with [`PostcodeDirectory::from_csv_reader`].
#[derive(Debug, Clone, Default)]
pub struct PostcodeDirectory {
    entries: HashMap<String, PostcodeEntry>,
}

impl PostcodeDirectory {
    pub fn norway() -> Self {
        let mut directory = Self::default();
        directory.insert("0150", 59.9139, 10.7522, "Oslo", "Oslo");
        directory.insert("7030", 63.4305, 10.3951, "Trondheim", "Trøndelag");
        directory.insert("5020", 60.3913, 5.3221, "Bergen", "Vestland");
        directory.insert("4020", 58.9700, 5.7331, "Stavanger", "Rogaland");
        directory.insert("9010", 69.6496, 18.9560, "Tromsø", "Troms og Finnmark");
        directory
    }

    /// Load `postcode,lat,lng,municipality,region` rows with a header line.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut directory = Self::default();
        for row in dataset::read_rows::<PostcodeRow, _>(reader)? {
            directory.insert(&row.postcode, row.lat, row.lng, &row.municipality, &row.region);
        }
        Ok(directory)
    }

    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        Self::from_csv_reader(dataset::open(path)?)
    }

    pub fn insert(
        &mut self,
        postcode: &str,
        lat: f64,
        lng: f64,
        municipality: &str,
        region: &str,
    ) {
        self.entries.insert(
            normalize_postcode(postcode),
            PostcodeEntry {
                lat,
                lng,
                municipality: municipality.to_string(),
                region: region.to_string(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GeoResolver for PostcodeDirectory {
    fn resolve(&self, postcode: &str) -> Result<GeoPoint, GeoError> {
        let normalized = normalize_postcode(postcode);
        let entry = self
            .entries
            .get(&normalized)
            .ok_or_else(|| GeoError::UnknownPostcode(postcode.to_string()))?;

        Ok(GeoPoint {
            lat: entry.lat,
            lng: entry.lng,
            postcode: normalized,
            municipality: entry.municipality.clone(),
            region: entry.region.clone(),
        })
    }
}
