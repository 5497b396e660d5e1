use crate::infra::{AppState, IntelligenceService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lead_intel::workflows::intelligence::intelligence_router;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_intelligence_routes(service: Arc<IntelligenceService>) -> axum::Router {
    intelligence_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{build_service, clock_for};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use lead_intel::config::IntelligenceConfig;
    use lead_intel::workflows::intelligence::ScoringConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    fn router(state: AppState) -> axum::Router {
        let config = IntelligenceConfig {
            signal_seed: 42,
            postcodes_csv: None,
            providers_csv: None,
            scoring: ScoringConfig::default(),
        };
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date");
        let service = build_service(&config, Arc::new(clock_for(day))).expect("fixtures load");
        with_intelligence_routes(service).layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let state = state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_metrics_are_served_next_to_api_routes() {
        let router = router(state(true));

        let response = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");

        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn geo_analysis_runs_against_fixture_datasets() {
        let router = router(state(true));
        let payload = json!({
            "lead": {
                "id": "lead-1",
                "title": "Lekkasje på bad",
                "category": "rørlegging",
                "metadata": { "postalCode": "0150" }
            }
        });

        let response = router
            .oneshot(
                Request::post("/api/v1/leads/geo-analysis")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["customer_location"]["municipality"], "Oslo");
        assert_eq!(body["coverage"][0]["provider_id"], "oslo-ror");
    }
}
