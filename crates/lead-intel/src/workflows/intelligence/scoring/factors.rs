use serde::{Deserialize, Serialize};

use super::ScoringError;

/// Normalized interaction signals feeding the scoring rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringFactors {
    // behavioral
    pub page_views: f64,
    /// Seconds.
    pub time_on_site: f64,
    pub form_completion_rate: f64,
    pub email_engagement: f64,
    // demographic
    pub company_size: f64,
    pub industry_match: f64,
    pub location_relevance: f64,
    pub budget_indicator: f64,
    // engagement
    /// Hours.
    pub response_time: f64,
    pub communication_quality: f64,
    pub requirements_clarity: f64,
    pub urgency_level: f64,
}

impl Default for ScoringFactors {
    fn default() -> Self {
        Self {
            page_views: 3.0,
            time_on_site: 120.0,
            form_completion_rate: 1.0,
            email_engagement: 0.5,
            company_size: 1.0,
            industry_match: 0.8,
            location_relevance: 0.9,
            budget_indicator: 0.6,
            response_time: 2.0,
            communication_quality: 0.7,
            requirements_clarity: 0.8,
            urgency_level: 0.5,
        }
    }
}

/// Sparse factor set used for stored analytics and caller overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringFactorsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_views: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_on_site: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_completion_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_engagement: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_relevance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_indicator: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication_quality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements_clarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<f64>,
}

impl ScoringFactors {
    /// Overlay every field the patch sets.
    pub fn apply(&mut self, patch: &ScoringFactorsPatch) {
        fn set(slot: &mut f64, value: Option<f64>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.page_views, patch.page_views);
        set(&mut self.time_on_site, patch.time_on_site);
        set(&mut self.form_completion_rate, patch.form_completion_rate);
        set(&mut self.email_engagement, patch.email_engagement);
        set(&mut self.company_size, patch.company_size);
        set(&mut self.industry_match, patch.industry_match);
        set(&mut self.location_relevance, patch.location_relevance);
        set(&mut self.budget_indicator, patch.budget_indicator);
        set(&mut self.response_time, patch.response_time);
        set(&mut self.communication_quality, patch.communication_quality);
        set(&mut self.requirements_clarity, patch.requirements_clarity);
        set(&mut self.urgency_level, patch.urgency_level);
    }

    /// Defaults, then stored analytics, then the caller override.
    pub fn merge(
        analytics: Option<&ScoringFactorsPatch>,
        factors_override: Option<&ScoringFactorsPatch>,
    ) -> Self {
        let mut factors = Self::default();
        for patch in [analytics, factors_override].into_iter().flatten() {
            factors.apply(patch);
        }
        factors
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        let ratios = [
            ("form_completion_rate", self.form_completion_rate),
            ("email_engagement", self.email_engagement),
            ("industry_match", self.industry_match),
            ("location_relevance", self.location_relevance),
            ("budget_indicator", self.budget_indicator),
            ("communication_quality", self.communication_quality),
            ("requirements_clarity", self.requirements_clarity),
            ("urgency_level", self.urgency_level),
        ];
        for (field, value) in ratios {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ScoringError::InvalidFactors { field, value });
            }
        }

        let non_negative = [
            ("page_views", self.page_views),
            ("time_on_site", self.time_on_site),
            ("response_time", self.response_time),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidFactors { field, value });
            }
        }

        if !self.company_size.is_finite() || self.company_size < 1.0 {
            return Err(ScoringError::InvalidFactors {
                field: "company_size",
                value: self.company_size,
            });
        }

        Ok(())
    }
}
