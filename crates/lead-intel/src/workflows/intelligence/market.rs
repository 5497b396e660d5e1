use std::sync::Arc;

use super::domain::{MarketDemand, SeasonalTrend};
use super::signals::SignalSource;

const CONSTRUCTION_KEYWORDS: [&str; 4] = ["tak", "bygg", "roof", "construction"];
const PLUMBING_KEYWORDS: [&str; 4] = ["rør", "varme", "plumb", "heat"];

/// Seasonal and categorical demand index for a region.
pub struct MarketDemandModel {
    signals: Arc<dyn SignalSource>,
}

impl MarketDemandModel {
    pub fn new(signals: Arc<dyn SignalSource>) -> Self {
        Self { signals }
    }

    /// `month` is the calendar month, 1 through 12.
    pub fn demand(&self, region: &str, category: &str, month: u32) -> MarketDemand {
        let subject = format!("{}/{}", region, category.to_lowercase());
        let multiplier = seasonal_multiplier(category, month);
        let base = self.signals.between("area_demand", &subject, 50.0, 90.0);

        MarketDemand {
            area_demand_score: (base * multiplier).round() as u32,
            seasonal_trend: seasonal_trend(multiplier),
            competition_level: self.signals.between("competition", &subject, 40.0, 80.0),
            price_sensitivity: self.signals.sample("price_sensitivity", &subject),
            service_frequency: self.signals.between("service_frequency", &subject, 0.3, 0.7),
            growth_potential: self.signals.sample("growth_potential", &subject),
        }
    }
}

pub fn seasonal_multiplier(category: &str, month: u32) -> f64 {
    let category = category.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|keyword| category.contains(keyword));

    if matches(&CONSTRUCTION_KEYWORDS) {
        if (3..=8).contains(&month) {
            1.3
        } else {
            0.8
        }
    } else if matches(&PLUMBING_KEYWORDS) {
        if month >= 9 || month <= 2 {
            1.2
        } else {
            0.9
        }
    } else {
        1.0
    }
}

pub fn seasonal_trend(multiplier: f64) -> SeasonalTrend {
    if multiplier > 1.1 {
        SeasonalTrend::High
    } else if multiplier < 0.9 {
        SeasonalTrend::Low
    } else {
        SeasonalTrend::Medium
    }
}
