use super::config::ScoringConfig;
use super::factors::ScoringFactors;

/// Base lead values in NOK keyed by lower-cased category.
const BASE_PRICES: [(&str, f64); 5] = [
    ("rørlegging", 8000.0),
    ("elektro", 6000.0),
    ("bygg", 15000.0),
    ("maling", 4000.0),
    ("tak", 12000.0),
];
const DEFAULT_BASE_PRICE: f64 = 5000.0;

/// Unrounded component scores; rounding happens only when the record is built.
pub(crate) struct ComponentScores {
    pub behavioral: f64,
    pub demographic: f64,
    pub engagement: f64,
}

impl ComponentScores {
    pub fn total(&self, config: &ScoringConfig) -> f64 {
        self.behavioral * config.behavioral
            + self.demographic * config.demographic
            + self.engagement * config.engagement
    }

    pub fn quality(&self) -> f64 {
        (self.behavioral + self.engagement) / 2.0
    }

    /// Fixed-weight logistic estimate, independent of the configurable weights.
    pub fn conversion_probability(&self) -> f64 {
        let weighted = self.behavioral * 0.35 + self.demographic * 0.25 + self.engagement * 0.4;
        1.0 / (1.0 + (-(weighted - 50.0) / 20.0).exp())
    }
}

pub(crate) fn component_scores(factors: &ScoringFactors) -> ComponentScores {
    ComponentScores {
        behavioral: behavioral_score(factors),
        demographic: demographic_score(factors),
        engagement: engagement_score(factors),
    }
}

fn behavioral_score(factors: &ScoringFactors) -> f64 {
    // saturates at 20 pages and 10 minutes
    let page_views = (factors.page_views * 5.0).min(100.0);
    let time_on_site = (factors.time_on_site / 60.0 * 10.0).min(100.0);
    let completion = factors.form_completion_rate * 100.0;
    let email = factors.email_engagement * 100.0;

    (page_views + time_on_site + completion + email) / 4.0
}

fn demographic_score(factors: &ScoringFactors) -> f64 {
    let size = ((factors.company_size + 1.0).log10() * 20.0).min(100.0);
    let industry = factors.industry_match * 100.0;
    let location = factors.location_relevance * 100.0;
    let budget = factors.budget_indicator * 100.0;

    (size + industry + location + budget) / 4.0
}

fn engagement_score(factors: &ScoringFactors) -> f64 {
    let response = (100.0 - factors.response_time * 10.0).max(0.0);
    let communication = factors.communication_quality * 100.0;
    let clarity = factors.requirements_clarity * 100.0;
    let urgency = factors.urgency_level * 100.0;

    (response + communication + clarity + urgency) / 4.0
}

pub(crate) fn base_price(category: &str) -> f64 {
    let key = category.trim().to_lowercase();
    BASE_PRICES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

pub(crate) fn estimate_value(total: f64, category: &str, factors: &ScoringFactors) -> u64 {
    let score_multiplier = 0.5 + (total / 100.0) * 1.5;
    let urgency_multiplier = 1.0 + factors.urgency_level * 0.5;
    let budget_multiplier = 0.7 + factors.budget_indicator * 0.6;

    let value = base_price(category) * score_multiplier * urgency_multiplier * budget_multiplier;
    value.round().max(0.0) as u64
}
