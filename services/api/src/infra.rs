use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use lead_intel::config::IntelligenceConfig;
use lead_intel::error::AppError;
use lead_intel::workflows::intelligence::{
    Clock, Coordinates, FixedClock, GeographicAnalysisBuilder, InMemoryProviderDirectory,
    InMemoryScoreRepository, LeadIntelligenceService, PostcodeDirectory, ProviderId,
    SeededSignals, ServiceProvider,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type IntelligenceService = LeadIntelligenceService<InMemoryScoreRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the service from configured datasets, falling back to the bundled fixtures.
pub(crate) fn build_service(
    config: &IntelligenceConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<IntelligenceService>, AppError> {
    let postcodes = match &config.postcodes_csv {
        Some(path) => PostcodeDirectory::from_path(path)?,
        None => PostcodeDirectory::norway(),
    };
    let providers = match &config.providers_csv {
        Some(path) => InMemoryProviderDirectory::from_path(path)?,
        None => fixture_providers(),
    };

    info!(
        postcodes = postcodes.len(),
        providers = providers.providers().len(),
        seed = config.signal_seed,
        "lead intelligence datasets loaded"
    );

    let analyses = Arc::new(GeographicAnalysisBuilder::new(
        Arc::new(postcodes),
        Arc::new(providers),
        Arc::new(SeededSignals::new(config.signal_seed)),
        clock.clone(),
    ));

    Ok(Arc::new(LeadIntelligenceService::new(
        Arc::new(InMemoryScoreRepository::default()),
        analyses,
        clock,
        config.scoring.clone(),
    )))
}

pub(crate) fn fixture_providers() -> InMemoryProviderDirectory {
    let provider = |id: &str, name: &str, categories: &[&str], location: Option<(f64, f64)>| {
        ServiceProvider {
            id: ProviderId(id.to_string()),
            name: name.to_string(),
            categories: categories.iter().map(|tag| tag.to_string()).collect(),
            location: location.map(|(lat, lng)| Coordinates::new(lat, lng)),
        }
    };

    InMemoryProviderDirectory::new(vec![
        provider(
            "oslo-ror",
            "Oslo Rør og Varme AS",
            &["rørlegging", "varme"],
            Some((59.9275, 10.7160)),
        ),
        provider(
            "groruddalen-elektro",
            "Groruddalen Elektro",
            &["elektro"],
            Some((59.9560, 10.8880)),
        ),
        provider(
            "bergen-tak",
            "Bergen Tak og Bygg",
            &["tak", "bygg"],
            Some((60.3680, 5.3500)),
        ),
        provider(
            "trondheim-maler",
            "Trondheim Malerservice",
            &["maling"],
            Some((63.4200, 10.4100)),
        ),
        provider(
            "stavanger-ror",
            "Stavanger Rørleggerbedrift",
            &["rørlegging"],
            Some((58.9500, 5.7000)),
        ),
        provider("nord-bygg", "Nord Bygg", &["bygg"], None),
    ])
}

/// Midnight UTC on `day`, for reproducible demo runs.
pub(crate) fn clock_for(day: NaiveDate) -> FixedClock {
    FixedClock(Utc.from_utc_datetime(&day.and_time(NaiveTime::default())))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
