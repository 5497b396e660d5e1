use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::domain::{Lead, LeadId};
use super::repository::ScoreRepository;
use super::scoring::{ScoringConfigPatch, ScoringFactorsPatch};
use super::service::{LeadIntelligenceError, LeadIntelligenceService};
use crate::error::AppError;

/// Router builder exposing scoring, analysis, and distribution endpoints.
pub fn intelligence_router<R>(service: Arc<LeadIntelligenceService<R>>) -> Router
where
    R: ScoreRepository + 'static,
{
    Router::new()
        .route("/api/v1/leads/score", post(score_handler::<R>))
        .route("/api/v1/leads/score/bulk", post(bulk_score_handler::<R>))
        .route("/api/v1/leads/:lead_id/score", get(stored_score_handler::<R>))
        .route(
            "/api/v1/scoring/config",
            get(config_handler::<R>).patch(update_config_handler::<R>),
        )
        .route("/api/v1/leads/geo-analysis", post(analysis_handler::<R>))
        .route(
            "/api/v1/leads/distribution",
            post(distribution_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) lead: Lead,
    #[serde(default)]
    pub(crate) factors: Option<ScoringFactorsPatch>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeadRequest {
    pub(crate) lead: Lead,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeadBatchRequest {
    pub(crate) leads: Vec<Lead>,
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<LeadIntelligenceService<R>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.calculate_score(&request.lead, request.factors.as_ref()) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn bulk_score_handler<R>(
    State(service): State<Arc<LeadIntelligenceService<R>>>,
    axum::Json(request): axum::Json<LeadBatchRequest>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    let report = service.bulk_calculate_scores(&request.leads);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn stored_score_handler<R>(
    State(service): State<Arc<LeadIntelligenceService<R>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.score(&LeadId(lead_id)) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn config_handler<R>(
    State(service): State<Arc<LeadIntelligenceService<R>>>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.config())).into_response()
}

pub(crate) async fn update_config_handler<R>(
    State(service): State<Arc<LeadIntelligenceService<R>>>,
    axum::Json(patch): axum::Json<ScoringConfigPatch>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.update_config(&patch) {
        Ok(config) => (StatusCode::OK, axum::Json(config)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analysis_handler<R>(
    State(service): State<Arc<LeadIntelligenceService<R>>>,
    axum::Json(request): axum::Json<LeadRequest>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.analyze(&request.lead) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn distribution_handler<R>(
    State(service): State<Arc<LeadIntelligenceService<R>>>,
    axum::Json(request): axum::Json<LeadBatchRequest>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    let outcome = service.optimize_distribution(&request.leads);
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

fn error_response(err: LeadIntelligenceError) -> Response {
    AppError::from(err).into_response()
}
