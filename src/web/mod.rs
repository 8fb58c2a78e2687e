//! HTTP surfaces for the two applications.
//!
//! Each application gets its own router and state. The state carries the
//! read-only dataset or model loaded at startup plus the renderer to use.

pub mod dashboard;
pub mod predictor;

use crate::dataset::Dataset;
use crate::predictor::ChargeModel;
use crate::render::{DashboardRenderer, PredictionRenderer};

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

#[derive(Clone)]
pub struct DashboardState {
    pub dataset: Arc<Dataset>,
    pub renderer: Arc<dyn DashboardRenderer>,
}

#[derive(Clone)]
pub struct PredictorState {
    pub model: Arc<dyn ChargeModel>,
    pub renderer: Arc<dyn PredictionRenderer>,
}

pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(dashboard::overview_page))
        .route("/age", get(dashboard::age_page))
        .route("/bmi", get(dashboard::bmi_page))
        .route("/api/overview", get(dashboard::overview_json))
        .route("/api/age", get(dashboard::age_json))
        .route("/api/bmi", get(dashboard::bmi_json))
        .route("/health", get(health_check))
        .fallback(dashboard::page_for_path)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}

pub fn predictor_router(state: PredictorState) -> Router {
    Router::new()
        .route("/", get(predictor::form_page))
        .route("/predict", post(predictor::predict_form))
        .route("/api/predict", post(predictor::predict_json))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}

pub async fn serve(router: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
