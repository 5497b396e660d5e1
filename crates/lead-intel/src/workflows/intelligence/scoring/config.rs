use serde::{Deserialize, Serialize};

use super::ScoringError;

/// Weights blending the component scores into the total score.
///
/// The weights are expected to sum to 1 so totals stay comparable over time; this is not
/// enforced. Scores are snapshots, so changing the weights never rewrites stored scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub behavioral: f64,
    pub demographic: f64,
    pub engagement: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            behavioral: 0.30,
            demographic: 0.25,
            engagement: 0.35,
        }
    }
}

impl ScoringConfig {
    /// Apply a partial update, keeping any weight the patch leaves unset.
    pub fn merged(&self, patch: &ScoringConfigPatch) -> Self {
        Self {
            behavioral: patch.behavioral.unwrap_or(self.behavioral),
            demographic: patch.demographic.unwrap_or(self.demographic),
            engagement: patch.engagement.unwrap_or(self.engagement),
        }
    }

    /// Every weight must be a finite, non-negative number.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let weights = [
            ("behavioral", self.behavioral),
            ("demographic", self.demographic),
            ("engagement", self.engagement),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidWeight { field, value });
            }
        }
        Ok(())
    }
}

/// Partial weight update accepted by `update_config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavioral: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_patch_keeps_unset_weights() {
        let merged = ScoringConfig::default().merged(&ScoringConfigPatch {
            demographic: Some(0.4),
            ..ScoringConfigPatch::default()
        });

        assert_eq!(merged.behavioral, 0.30);
        assert_eq!(merged.demographic, 0.4);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn negative_and_non_finite_weights_are_invalid() {
        let negative = ScoringConfig {
            behavioral: -5.0,
            ..ScoringConfig::default()
        };
        assert_eq!(
            negative.validate(),
            Err(ScoringError::InvalidWeight {
                field: "behavioral",
                value: -5.0
            })
        );

        let infinite = ScoringConfig {
            engagement: f64::INFINITY,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            infinite.validate(),
            Err(ScoringError::InvalidWeight {
                field: "engagement",
                ..
            })
        ));
    }
}
