use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use handwerk_os::workflows::cockpit::{
    cockpit_router, ProjectCockpitService, ProjectSnapshotSource, WorkflowSource,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_cockpit_routes<P, W>(service: Arc<ProjectCockpitService<P, W>>) -> axum::Router
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    cockpit_router(service)
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
    use crate::infra::InMemoryProjectStore;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use handwerk_os::workflows::health::HealthThresholds;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let today = NaiveDate::from_ymd_opt(2025, 4, 14).expect("valid date");
        let store = Arc::new(InMemoryProjectStore::demo(today));
        let service = Arc::new(ProjectCockpitService::new(
            store.clone(),
            store,
            HealthThresholds::default(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_cockpit_routes(service).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::get(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn demo_store_is_served_through_cockpit_routes() {
        let (status, body) = get(
            app(true),
            "/api/v1/projects/proj-heating-bauer/health?today=2025-04-14",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "red");

        let (status, body) = get(app(true), "/api/v1/companies/handwerk-gmbh/workflow/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_projects"], 3);
        assert_eq!(body["manual_override"], 1);
    }
}
