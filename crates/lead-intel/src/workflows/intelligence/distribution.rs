use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::analysis::{AnalysisBatch, GeographicAnalysisBuilder};
use super::coverage::rank_coverage;
use super::domain::{Availability, Lead, LeadId, ProviderId, ServiceAreaCoverage};

/// Provider to assigned leads, in batch order.
pub type Distribution = BTreeMap<ProviderId, Vec<LeadId>>;

/// Greedy per-lead assignment of leads to the best-covering available provider.
///
/// Assignment ignores provider capacity and load balance; callers that need caps must
/// apply their own admission control on top of the result.
pub struct DistributionOptimizer {
    analyses: Arc<GeographicAnalysisBuilder>,
}

impl DistributionOptimizer {
    pub fn new(analyses: Arc<GeographicAnalysisBuilder>) -> Self {
        Self { analyses }
    }

    pub fn optimize(&self, leads: &[Lead]) -> Distribution {
        self.optimize_with_report(leads).assignments
    }

    /// Like [`DistributionOptimizer::optimize`], also reporting leads left unassigned.
    ///
    /// Each call runs in a fresh [`AnalysisBatch`], so no analysis outlives the call.
    pub fn optimize_with_report(&self, leads: &[Lead]) -> DistributionOutcome {
        let batch = self.analyses.batch();
        self.optimize_within(&batch, leads)
    }

    /// Assign leads reusing analyses already made in `batch`.
    pub fn optimize_within(
        &self,
        batch: &AnalysisBatch<'_>,
        leads: &[Lead],
    ) -> DistributionOutcome {
        let mut outcome = DistributionOutcome::default();
        let mut seen = HashSet::new();

        for lead in leads {
            if !seen.insert(lead.id.clone()) {
                continue;
            }

            let analysis = match batch.cached_or_analyze(lead) {
                Ok(analysis) => analysis,
                Err(err) => {
                    warn!(lead_id = %lead.id, error = %err, "skipping lead without analysis");
                    outcome.unassigned.push(UnassignedLead {
                        lead_id: lead.id.clone(),
                        reason: UnassignedReason::AnalysisFailed(err.to_string()),
                    });
                    continue;
                }
            };

            match best_available(&analysis.coverage) {
                Some(best) => outcome
                    .assignments
                    .entry(best.provider_id.clone())
                    .or_default()
                    .push(lead.id.clone()),
                None => outcome.unassigned.push(UnassignedLead {
                    lead_id: lead.id.clone(),
                    reason: UnassignedReason::NoAvailableProvider,
                }),
            }
        }

        info!(
            leads = leads.len(),
            providers = outcome.assignments.len(),
            unassigned = outcome.unassigned.len(),
            "lead distribution complete"
        );
        outcome
    }
}

pub(crate) fn best_available(coverage: &[ServiceAreaCoverage]) -> Option<&ServiceAreaCoverage> {
    coverage
        .iter()
        .filter(|entry| entry.availability == Availability::Available)
        .min_by(|a, b| rank_coverage(a, b))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionOutcome {
    pub assignments: Distribution,
    pub unassigned: Vec<UnassignedLead>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedLead {
    pub lead_id: LeadId,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum UnassignedReason {
    AnalysisFailed(String),
    NoAvailableProvider,
}
