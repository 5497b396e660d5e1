use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::dataset::{self, DatasetError};
use super::domain::{Coordinates, ProviderId, ServiceProvider};

/// External directory of active service providers.
pub trait ProviderDirectory: Send + Sync {
    /// Providers whose category tags contain `category`.
    fn list_providers(&self, category: &str) -> Result<Vec<ServiceProvider>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("provider directory unavailable: {0}")]
    Unavailable(String),
}

/// Directory held in memory, used for fixtures and CSV-seeded deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderDirectory {
    providers: Vec<ServiceProvider>,
}

#[derive(Debug, Deserialize)]
struct ProviderRow {
    id: String,
    name: String,
    /// `|`-separated category tags.
    categories: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

impl InMemoryProviderDirectory {
    pub fn new(providers: Vec<ServiceProvider>) -> Self {
        Self { providers }
    }

    /// Load `id,name,categories,lat,lng` rows; blank coordinates leave the location unknown.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let providers = dataset::read_rows::<ProviderRow, _>(reader)?
            .into_iter()
            .map(|row| ServiceProvider {
                id: ProviderId(row.id),
                name: row.name,
                categories: row
                    .categories
                    .split('|')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect(),
                location: match (row.lat, row.lng) {
                    (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
                    _ => None,
                },
            })
            .collect();

        Ok(Self { providers })
    }

    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        Self::from_csv_reader(dataset::open(path)?)
    }

    pub fn push(&mut self, provider: ServiceProvider) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> &[ServiceProvider] {
        &self.providers
    }
}

impl ProviderDirectory for InMemoryProviderDirectory {
    fn list_providers(&self, category: &str) -> Result<Vec<ServiceProvider>, DirectoryError> {
        Ok(self
            .providers
            .iter()
            .filter(|provider| provider.services(category))
            .cloned()
            .collect())
    }
}
