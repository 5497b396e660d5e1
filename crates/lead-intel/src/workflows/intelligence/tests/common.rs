use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::intelligence::directory::{DirectoryError, ProviderDirectory};
use crate::workflows::intelligence::repository::{RepositoryError, ScoreRepository};
use crate::workflows::intelligence::{
    intelligence_router, Coordinates, FixedClock, GeographicAnalysisBuilder,
    InMemoryProviderDirectory, InMemoryScoreRepository, Lead, LeadId, LeadIntelligenceService,
    LeadMetadata, LeadScore, NeutralSignals, PostcodeDirectory, ProviderId, ScoringConfig,
    ServiceProvider,
};

pub(super) const OSLO: Coordinates = Coordinates::new(59.9139, 10.7522);
/// Kilometres per degree of latitude on the haversine sphere.
const KM_PER_DEGREE: f64 = 6371.0 * std::f64::consts::PI / 180.0;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(now()))
}

pub(super) fn lead(id: &str, category: &str, postcode: Option<&str>) -> Lead {
    Lead {
        id: LeadId(id.to_string()),
        title: format!("{category} job"),
        description: String::new(),
        category: category.to_string(),
        metadata: LeadMetadata {
            postcode: postcode.map(str::to_string),
            analytics: None,
        },
    }
}

pub(super) fn oslo_lead(id: &str) -> Lead {
    lead(id, "rørlegging", Some("0150"))
}

/// Provider due north of central Oslo, `km` kilometres away.
pub(super) fn provider_north_of_oslo(id: &str, km: f64) -> ServiceProvider {
    ServiceProvider {
        id: ProviderId(id.to_string()),
        name: format!("Provider {id}"),
        categories: vec!["rørlegging".to_string()],
        location: Some(Coordinates::new(OSLO.lat + km / KM_PER_DEGREE, OSLO.lng)),
    }
}

pub(super) fn analysis_builder(providers: Vec<ServiceProvider>) -> Arc<GeographicAnalysisBuilder> {
    Arc::new(GeographicAnalysisBuilder::new(
        Arc::new(PostcodeDirectory::norway()),
        Arc::new(InMemoryProviderDirectory::new(providers)),
        Arc::new(NeutralSignals),
        clock(),
    ))
}

pub(super) fn build_service(
    providers: Vec<ServiceProvider>,
) -> (
    LeadIntelligenceService<InMemoryScoreRepository>,
    Arc<InMemoryScoreRepository>,
) {
    let repository = Arc::new(InMemoryScoreRepository::default());
    let service = LeadIntelligenceService::new(
        repository.clone(),
        analysis_builder(providers),
        clock(),
        ScoringConfig::default(),
    );
    (service, repository)
}

pub(super) fn router_with_service(
    service: LeadIntelligenceService<InMemoryScoreRepository>,
) -> axum::Router {
    intelligence_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

impl ScoreRepository for UnavailableRepository {
    fn upsert(&self, _score: LeadScore) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _lead_id: &LeadId) -> Result<Option<LeadScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<LeadScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineDirectory;

impl ProviderDirectory for OfflineDirectory {
    fn list_providers(&self, _category: &str) -> Result<Vec<ServiceProvider>, DirectoryError> {
        Err(DirectoryError::Unavailable("timeout".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
