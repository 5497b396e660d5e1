//! Lead intelligence: scoring, geographic analysis, and provider distribution.
//!
//! Everything here is synchronous and deterministic for a fixed clock and signal source.
//! Batch operations walk leads in order and skip, rather than abort on, a failing lead.

pub mod analysis;
pub mod clock;
pub mod coverage;
pub mod dataset;
pub mod directory;
pub mod distribution;
pub mod domain;
pub mod geo;
pub mod market;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod signals;

#[cfg(test)]
mod tests;

pub use analysis::{extract_postcode, AnalysisBatch, AnalysisError, GeographicAnalysisBuilder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use coverage::CoverageResolver;
pub use dataset::DatasetError;
pub use directory::{DirectoryError, InMemoryProviderDirectory, ProviderDirectory};
pub use distribution::{
    Distribution, DistributionOptimizer, DistributionOutcome, UnassignedLead, UnassignedReason,
};
pub use domain::{
    AccessibilityRating, Availability, Coordinates, GeoPoint, GeographicAnalysis, Lead, LeadId,
    LeadMetadata, MarketDemand, ProviderId, RegionalPricing, SeasonalTrend, ServiceAreaCoverage,
    ServiceProvider, TravelTimeAnalysis,
};
pub use geo::{GeoError, GeoResolver, PostcodeDirectory};
pub use market::MarketDemandModel;
pub use repository::{InMemoryScoreRepository, RepositoryError, ScoreRepository};
pub use router::intelligence_router;
pub use scoring::{
    LeadScore, ScoreRange, ScoringConfig, ScoringConfigPatch, ScoringEngine, ScoringError,
    ScoringFactors, ScoringFactorsPatch,
};
pub use service::{BulkScoreReport, LeadFailure, LeadIntelligenceError, LeadIntelligenceService};
pub use signals::{NeutralSignals, SeededSignals, SignalSource};
