//! HTTP API Layer
//!
//! REST surface of the claim intake service, built on Axum.
//!
//! # Routes
//!
//! - `POST /api/v1/claims`: multipart claim submission
//! - `GET /api/v1/reports`: persisted reports as dashboard rows, filtered by
//!   `damage_type`, `fraud`, `from` and `to`
//! - `GET /api/v1/reports/summary`: aggregates over the same filter
//! - `GET /health`, `GET /health/ready`: liveness and readiness
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(intake, &ports, clock, config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::Clock;
use domain_claims::{
    ClaimHistoryPort, ClaimIntakeService, ClaimReportPort, IntakePorts, ReportQueryService,
};

use crate::config::ApiConfig;
use crate::handlers::{claims, health};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<ClaimIntakeService>,
    pub queries: ReportQueryService,
    pub history: Arc<dyn ClaimHistoryPort>,
    pub reports: Arc<dyn ClaimReportPort>,
    /// Supplies the default claim date
    pub clock: Arc<dyn Clock>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(
        intake: ClaimIntakeService,
        ports: &IntakePorts,
        clock: Arc<dyn Clock>,
        config: ApiConfig,
    ) -> Self {
        Self {
            intake: Arc::new(intake),
            queries: ReportQueryService::new(ports.reports.clone()),
            history: ports.history.clone(),
            reports: ports.reports.clone(),
            clock,
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new().route("/", post(claims::submit_claim));

    let report_routes = Router::new()
        .route("/", get(claims::list_reports))
        .route("/summary", get(claims::report_summary));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
