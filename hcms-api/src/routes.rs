//! API Routes
//!
//! Route definitions for the HCMS API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{company_middleware, ingest_key_middleware};
use crate::handlers::*;
use crate::metrics::{metrics_handler, metrics_middleware};
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // Company-scoped points queries
    let points_router = Router::new()
        .route(
            "/projects/:project_id/points/remaining",
            get(get_remaining_points),
        )
        .route("/projects/:project_id/eligibility", get(get_eligibility))
        .route("/maintenance/projects", get(list_maintenance_projects))
        .route("/point-usage", get(get_point_usage))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            company_middleware,
        ));

    // Ledger ingest
    let ingest_router = Router::new()
        .route("/ledger/entries", post(append_ledger_entry))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            ingest_key_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(points_router)
        .merge(ingest_router)
        .with_state(state)
}

/// Create a router for the V1 API with /api/v1 prefix
pub fn create_v1_router(state: Arc<AppState>) -> Router {
    Router::new().nest("/api/v1", create_router(state))
}

/// Build the full application router
pub fn build_app(state: AppState) -> Router {
    let state = Arc::new(state);
    let enable_cors = state.config.enable_cors;
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    let root_router = Router::new().route("/", get(|| async { "HCMS Points API" }));

    let health_router = Router::new()
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(state.clone());

    let mut router = root_router
        .merge(health_router)
        .merge(create_v1_router(state.clone()))
        .layer(middleware::from_fn_with_state(state, metrics_middleware))
        .layer(TimeoutLayer::new(timeout));

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.layer(TraceLayer::new_for_http())
}
