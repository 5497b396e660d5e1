use std::cmp::Ordering;
use std::sync::Arc;

use super::domain::{Availability, Coordinates, GeoPoint, ServiceAreaCoverage, ServiceProvider};
use super::geo::distance::{
    availability_for, coverage_score, distance_km, travel_time_minutes, DEFAULT_TRAFFIC_FACTOR,
};
use super::signals::SignalSource;

/// Maximum jitter, in degrees, applied to providers without a registered location.
const UNKNOWN_LOCATION_SPREAD_DEG: f64 = 0.25;

/// Computes per-provider coverage for a resolved lead location.
pub struct CoverageResolver {
    signals: Arc<dyn SignalSource>,
}

impl CoverageResolver {
    pub fn new(signals: Arc<dyn SignalSource>) -> Self {
        Self { signals }
    }

    /// Coverage for every provider servicing `category`, best first.
    ///
    /// Providers beyond the limited radius are dropped; an empty result means no provider
    /// is in range and must be handled by the caller.
    pub fn resolve(
        &self,
        lead_location: &GeoPoint,
        candidates: &[ServiceProvider],
        category: &str,
    ) -> Vec<ServiceAreaCoverage> {
        let origin = lead_location.coordinates();
        let mut coverage: Vec<ServiceAreaCoverage> = candidates
            .iter()
            .filter(|provider| provider.services(category))
            .map(|provider| {
                let location = self.provider_location(provider, lead_location);
                let distance = distance_km(origin, location);

                ServiceAreaCoverage {
                    provider_id: provider.id.clone(),
                    provider_name: provider.name.clone(),
                    coverage_score: coverage_score(distance),
                    distance_km: distance,
                    travel_time_minutes: travel_time_minutes(distance, DEFAULT_TRAFFIC_FACTOR),
                    rating: self.signals.between("provider_rating", &provider.id.0, 4.2, 4.8),
                    availability: availability_for(distance),
                }
            })
            .filter(|entry| entry.availability != Availability::Unavailable)
            .collect();

        coverage.sort_by(rank_coverage);
        coverage
    }

    fn provider_location(
        &self,
        provider: &ServiceProvider,
        lead_location: &GeoPoint,
    ) -> Coordinates {
        if let Some(location) = provider.location {
            return location;
        }

        let subject = format!("{}@{}", provider.id, lead_location.postcode);
        let spread = UNKNOWN_LOCATION_SPREAD_DEG;
        Coordinates::new(
            lead_location.lat + self.signals.between("provider_lat", &subject, -spread, spread),
            lead_location.lng + self.signals.between("provider_lng", &subject, -spread, spread),
        )
    }
}

/// Highest coverage first, then shortest travel time, then provider id.
pub(crate) fn rank_coverage(a: &ServiceAreaCoverage, b: &ServiceAreaCoverage) -> Ordering {
    b.coverage_score
        .total_cmp(&a.coverage_score)
        .then_with(|| a.travel_time_minutes.cmp(&b.travel_time_minutes))
        .then_with(|| a.provider_id.cmp(&b.provider_id))
}
