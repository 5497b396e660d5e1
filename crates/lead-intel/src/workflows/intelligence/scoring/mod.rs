mod config;
mod factors;
mod rules;

pub use config::{ScoringConfig, ScoringConfigPatch};
pub use factors::{ScoringFactors, ScoringFactorsPatch};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Lead, LeadId};

/// Evaluator applying one weight configuration to leads.
///
/// The engine carries no state beyond its configuration, so identical inputs and an
/// identical `calculated_at` always produce an identical [`LeadScore`].
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(
        &self,
        lead: &Lead,
        factors_override: Option<&ScoringFactorsPatch>,
        calculated_at: DateTime<Utc>,
    ) -> Result<LeadScore, ScoringError> {
        let factors = ScoringFactors::merge(lead.metadata.analytics.as_ref(), factors_override);
        factors.validate()?;

        let components = rules::component_scores(&factors);
        let total = components.total(&self.config).clamp(0.0, 100.0);
        let conversion_probability = components.conversion_probability();
        let value_estimate = rules::estimate_value(total, &lead.category, &factors);

        Ok(LeadScore {
            lead_id: lead.id.clone(),
            behavioral_score: as_score(components.behavioral),
            demographic_score: as_score(components.demographic),
            engagement_score: as_score(components.engagement),
            total_score: as_score(total),
            quality_score: as_score(components.quality()),
            conversion_probability: (conversion_probability * 100.0).round() / 100.0,
            value_estimate,
            factors,
            calculated_at,
        })
    }
}

fn as_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Immutable scoring snapshot for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub lead_id: LeadId,
    pub behavioral_score: u8,
    pub demographic_score: u8,
    pub engagement_score: u8,
    pub total_score: u8,
    pub quality_score: u8,
    pub conversion_probability: f64,
    pub value_estimate: u64,
    pub factors: ScoringFactors,
    pub calculated_at: DateTime<Utc>,
}

impl LeadScore {
    pub fn range(&self) -> ScoreRange {
        ScoreRange::from_score(self.total_score)
    }
}

/// Dashboard buckets for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRange {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreRange {
    pub const fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => ScoreRange::Excellent,
            70..=89 => ScoreRange::Good,
            50..=69 => ScoreRange::Fair,
            _ => ScoreRange::Poor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreRange::Excellent => "excellent",
            ScoreRange::Good => "good",
            ScoreRange::Fair => "fair",
            ScoreRange::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid scoring factor {field}: {value}")]
    InvalidFactors { field: &'static str, value: f64 },
    #[error("invalid scoring weight {field}: {value}")]
    InvalidWeight { field: &'static str, value: f64 },
}
