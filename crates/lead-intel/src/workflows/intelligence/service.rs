use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::analysis::{AnalysisError, GeographicAnalysisBuilder};
use super::clock::Clock;
use super::distribution::{DistributionOptimizer, DistributionOutcome};
use super::domain::{GeographicAnalysis, Lead, LeadId};
use super::repository::{RepositoryError, ScoreRepository};
use super::scoring::{
    LeadScore, ScoringConfig, ScoringConfigPatch, ScoringEngine, ScoringError, ScoringFactorsPatch,
};

/// Service composing the scoring engine, score store, and geographic layer.
pub struct LeadIntelligenceService<R> {
    repository: Arc<R>,
    config: RwLock<ScoringConfig>,
    clock: Arc<dyn Clock>,
    analyses: Arc<GeographicAnalysisBuilder>,
    optimizer: DistributionOptimizer,
}

impl<R> LeadIntelligenceService<R>
where
    R: ScoreRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        analyses: Arc<GeographicAnalysisBuilder>,
        clock: Arc<dyn Clock>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            repository,
            config: RwLock::new(config),
            clock,
            optimizer: DistributionOptimizer::new(analyses.clone()),
            analyses,
        }
    }

    /// Score a lead and store the result, replacing any earlier score for it.
    pub fn calculate_score(
        &self,
        lead: &Lead,
        factors_override: Option<&ScoringFactorsPatch>,
    ) -> Result<LeadScore, LeadIntelligenceError> {
        let engine = ScoringEngine::new(self.config());
        let score = engine.score(lead, factors_override, self.clock.now())?;
        self.repository.upsert(score.clone())?;
        Ok(score)
    }

    /// Score leads one after another; a failing lead is logged and left out.
    pub fn bulk_calculate_scores(&self, leads: &[Lead]) -> BulkScoreReport {
        let mut report = BulkScoreReport::default();

        for lead in leads {
            match self.calculate_score(lead, None) {
                Ok(score) => report.scored.push(score),
                Err(err) => {
                    warn!(lead_id = %lead.id, error = %err, "skipping lead that failed scoring");
                    report.failed.push(LeadFailure {
                        lead_id: lead.id.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            scored = report.scored.len(),
            failed = report.failed.len(),
            "bulk scoring complete"
        );
        report
    }

    pub fn score(&self, lead_id: &LeadId) -> Result<LeadScore, LeadIntelligenceError> {
        let score = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(score)
    }

    pub fn config(&self) -> ScoringConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge a partial weight update. Stored scores keep the weights they were made with.
    /// A rejected patch leaves the current weights in place.
    pub fn update_config(
        &self,
        patch: &ScoringConfigPatch,
    ) -> Result<ScoringConfig, LeadIntelligenceError> {
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let merged = guard.merged(patch);
        if let Err(err) = merged.validate() {
            warn!(error = %err, "scoring weight update rejected");
            return Err(err.into());
        }
        *guard = merged;
        info!(
            behavioral = guard.behavioral,
            demographic = guard.demographic,
            engagement = guard.engagement,
            "scoring weights updated"
        );
        Ok(guard.clone())
    }

    pub fn analyze(&self, lead: &Lead) -> Result<GeographicAnalysis, LeadIntelligenceError> {
        Ok(self.analyses.analyze(lead)?)
    }

    /// Assign a batch of leads against analyses made for this batch only.
    pub fn optimize_distribution(&self, leads: &[Lead]) -> DistributionOutcome {
        self.optimizer.optimize_with_report(leads)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkScoreReport {
    pub scored: Vec<LeadScore>,
    pub failed: Vec<LeadFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadFailure {
    pub lead_id: LeadId,
    pub error: String,
}

/// Error raised by the lead intelligence service.
#[derive(Debug, thiserror::Error)]
pub enum LeadIntelligenceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
