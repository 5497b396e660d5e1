use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use chrono::Datelike;
use regex::Regex;
use tracing::{debug, warn};

use super::clock::Clock;
use super::coverage::CoverageResolver;
use super::directory::ProviderDirectory;
use super::domain::{
    AccessibilityRating, GeographicAnalysis, Lead, LeadId, RegionalPricing, ServiceAreaCoverage,
    TravelTimeAnalysis,
};
use super::geo::{GeoError, GeoResolver};
use super::market::MarketDemandModel;
use super::signals::SignalSource;

const OPTIMAL_SERVICE_WINDOWS: [&str; 2] = ["08:00-10:00", "14:00-16:00"];
/// Provider count treated as a saturated market when normalizing competition density.
const EXPECTED_MAX_PROVIDERS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("no postal code found in lead {0}")]
    MissingPostcode(LeadId),
    #[error("unknown postal code {postcode} on lead {lead_id}")]
    UnknownPostcode { lead_id: LeadId, postcode: String },
}

/// Builds per-lead geographic analyses.
///
/// [`GeographicAnalysisBuilder::analyze`] never caches; batch callers open an
/// [`AnalysisBatch`] whose cache is dropped with it.
pub struct GeographicAnalysisBuilder {
    geo: Arc<dyn GeoResolver>,
    directory: Arc<dyn ProviderDirectory>,
    signals: Arc<dyn SignalSource>,
    clock: Arc<dyn Clock>,
    coverage: CoverageResolver,
    market: MarketDemandModel,
}

impl GeographicAnalysisBuilder {
    pub fn new(
        geo: Arc<dyn GeoResolver>,
        directory: Arc<dyn ProviderDirectory>,
        signals: Arc<dyn SignalSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            coverage: CoverageResolver::new(signals.clone()),
            market: MarketDemandModel::new(signals.clone()),
            geo,
            directory,
            signals,
            clock,
        }
    }

    pub fn analyze(&self, lead: &Lead) -> Result<GeographicAnalysis, AnalysisError> {
        let postcode =
            extract_postcode(lead).ok_or_else(|| AnalysisError::MissingPostcode(lead.id.clone()))?;

        let location = self.geo.resolve(&postcode).map_err(|err| match err {
            GeoError::UnknownPostcode(postcode) => AnalysisError::UnknownPostcode {
                lead_id: lead.id.clone(),
                postcode,
            },
        })?;

        let providers = match self.directory.list_providers(&lead.category) {
            Ok(providers) => providers,
            Err(err) => {
                warn!(
                    lead_id = %lead.id,
                    error = %err,
                    "provider lookup failed; treating as no coverage"
                );
                Vec::new()
            }
        };
        let coverage = self.coverage.resolve(&location, &providers, &lead.category);
        if coverage.is_empty() {
            debug!(lead_id = %lead.id, category = %lead.category, "no providers in range");
        }

        let travel_time_analysis = self.travel_times(&lead.id, &coverage);
        let month = self.clock.now().month();
        let market_demand = self.market.demand(&location.region, &lead.category, month);
        let regional_pricing = self.regional_pricing(&location.region);

        Ok(GeographicAnalysis {
            lead_id: lead.id.clone(),
            competition_density: coverage.len() as f64 / EXPECTED_MAX_PROVIDERS,
            customer_location: location,
            coverage,
            travel_time_analysis,
            market_demand,
            regional_pricing,
        })
    }

    /// Open a cache scoped to one batch of leads.
    pub fn batch(&self) -> AnalysisBatch<'_> {
        AnalysisBatch {
            builder: self,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn travel_times(
        &self,
        lead_id: &LeadId,
        coverage: &[ServiceAreaCoverage],
    ) -> TravelTimeAnalysis {
        let nearest = coverage.iter().map(|entry| entry.travel_time_minutes).min();
        let average = if coverage.is_empty() {
            None
        } else {
            let total: u32 = coverage.iter().map(|entry| entry.travel_time_minutes).sum();
            Some((f64::from(total) / coverage.len() as f64).round() as u32)
        };

        TravelTimeAnalysis {
            nearest_provider_minutes: nearest,
            average_travel_time: average,
            traffic_impact_score: self.signals.between("traffic_impact", &lead_id.0, 0.7, 1.3),
            accessibility_rating: AccessibilityRating::from_nearest_minutes(nearest),
            optimal_service_windows: OPTIMAL_SERVICE_WINDOWS
                .iter()
                .map(|window| window.to_string())
                .collect(),
        }
    }

    fn regional_pricing(&self, region: &str) -> RegionalPricing {
        RegionalPricing {
            base_price_multiplier: self.signals.between("price_multiplier", region, 0.9, 1.3),
            market_rate_comparison: self.signals.between("market_rate", region, -0.2, 0.2),
            premium_justification_score: self.signals.sample("premium_justification", region),
            price_elasticity: self.signals.between("price_elasticity", region, 0.3, 0.7),
        }
    }
}

/// Analyses cached by lead id for the lifetime of one batch.
///
/// Reads are shared, writes exclusive.
pub struct AnalysisBatch<'a> {
    builder: &'a GeographicAnalysisBuilder,
    cache: RwLock<HashMap<LeadId, GeographicAnalysis>>,
}

impl AnalysisBatch<'_> {
    /// Analyze a lead and remember the result for the rest of the batch.
    pub fn analyze(&self, lead: &Lead) -> Result<GeographicAnalysis, AnalysisError> {
        let analysis = self.builder.analyze(lead)?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(lead.id.clone(), analysis.clone());
        Ok(analysis)
    }

    pub fn cached(&self, lead_id: &LeadId) -> Option<GeographicAnalysis> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(lead_id)
            .cloned()
    }

    /// Cached analysis if present, otherwise a fresh one.
    pub fn cached_or_analyze(&self, lead: &Lead) -> Result<GeographicAnalysis, AnalysisError> {
        match self.cached(&lead.id) {
            Some(analysis) => Ok(analysis),
            None => self.analyze(lead),
        }
    }

    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Metadata postcode first, then the first run of four digits in the description.
pub fn extract_postcode(lead: &Lead) -> Option<String> {
    static FOUR_DIGITS: OnceLock<Regex> = OnceLock::new();

    if let Some(postcode) = lead
        .metadata
        .postcode
        .as_deref()
        .map(str::trim)
        .filter(|postcode| !postcode.is_empty())
    {
        return Some(postcode.to_string());
    }

    let pattern =
        FOUR_DIGITS.get_or_init(|| Regex::new(r"[0-9]{4}").expect("static pattern compiles"));
    pattern
        .find(&lead.description)
        .map(|found| found.as_str().to_string())
}
