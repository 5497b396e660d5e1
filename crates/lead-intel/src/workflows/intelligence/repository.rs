use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::domain::LeadId;
use super::scoring::LeadScore;

/// Score store keyed by lead id; a write replaces any earlier score for the lead.
pub trait ScoreRepository: Send + Sync {
    fn upsert(&self, score: LeadScore) -> Result<(), RepositoryError>;
    fn fetch(&self, lead_id: &LeadId) -> Result<Option<LeadScore>, RepositoryError>;
    fn all(&self) -> Result<Vec<LeadScore>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    scores: RwLock<HashMap<LeadId, LeadScore>>,
}

impl ScoreRepository for InMemoryScoreRepository {
    fn upsert(&self, score: LeadScore) -> Result<(), RepositoryError> {
        let mut guard = self.scores.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(score.lead_id.clone(), score);
        Ok(())
    }

    fn fetch(&self, lead_id: &LeadId) -> Result<Option<LeadScore>, RepositoryError> {
        let guard = self.scores.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(lead_id).cloned())
    }

    fn all(&self) -> Result<Vec<LeadScore>, RepositoryError> {
        let guard = self.scores.read().unwrap_or_else(PoisonError::into_inner);
        let mut scores: Vec<LeadScore> = guard.values().cloned().collect();
        scores.sort_by(|a, b| a.lead_id.cmp(&b.lead_id));
        Ok(scores)
    }
}
