use std::fmt;

use serde::{Deserialize, Serialize};

use super::scoring::ScoringFactorsPatch;

/// Identifier wrapper for leads owned by the external lead store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for service providers listed in the provider directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only view of a lead as handed to the engine by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub metadata: LeadMetadata,
}

/// Free-form lead metadata the engine knows how to read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadMetadata {
    #[serde(
        default,
        alias = "postalCode",
        alias = "postal_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub postcode: Option<String>,
    /// Interaction analytics captured upstream; merged beneath caller overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<ScoringFactorsPatch>,
}

/// Plain latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A resolved customer location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub postcode: String,
    pub municipality: String,
    pub region: String,
}

impl GeoPoint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Directory entry for a company that can take on leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: ProviderId,
    pub name: String,
    /// Category tags the provider services.
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
}

impl ServiceProvider {
    pub fn services(&self, category: &str) -> bool {
        let wanted = category.trim().to_lowercase();
        self.categories
            .iter()
            .any(|tag| tag.trim().to_lowercase() == wanted)
    }
}

/// Step function of distance describing whether a provider can take the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Limited,
    Unavailable,
}

impl Availability {
    pub const fn label(self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Limited => "limited",
            Availability::Unavailable => "unavailable",
        }
    }
}

/// How well one provider covers one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAreaCoverage {
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub coverage_score: f64,
    pub distance_km: f64,
    pub travel_time_minutes: u32,
    pub rating: f64,
    pub availability: Availability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AccessibilityRating {
    /// Buckets the nearest provider's travel time in minutes.
    pub fn from_nearest_minutes(minutes: Option<u32>) -> Self {
        match minutes {
            Some(m) if m <= 30 => AccessibilityRating::Excellent,
            Some(m) if m <= 45 => AccessibilityRating::Good,
            Some(m) if m <= 60 => AccessibilityRating::Fair,
            _ => AccessibilityRating::Poor,
        }
    }
}

/// Aggregate travel metrics over a lead's coverage list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeAnalysis {
    pub nearest_provider_minutes: Option<u32>,
    pub average_travel_time: Option<u32>,
    pub traffic_impact_score: f64,
    pub accessibility_rating: AccessibilityRating,
    pub optimal_service_windows: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalTrend {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDemand {
    pub area_demand_score: u32,
    pub seasonal_trend: SeasonalTrend,
    pub competition_level: f64,
    pub price_sensitivity: f64,
    pub service_frequency: f64,
    pub growth_potential: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPricing {
    pub base_price_multiplier: f64,
    pub market_rate_comparison: f64,
    pub premium_justification_score: f64,
    pub price_elasticity: f64,
}

/// Per-lead location intelligence record rendered by dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicAnalysis {
    pub lead_id: LeadId,
    pub customer_location: GeoPoint,
    pub coverage: Vec<ServiceAreaCoverage>,
    pub travel_time_analysis: TravelTimeAnalysis,
    pub market_demand: MarketDemand,
    pub competition_density: f64,
    pub regional_pricing: RegionalPricing,
}
