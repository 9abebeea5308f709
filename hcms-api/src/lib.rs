//! HCMS API - HTTP Interface Layer
//!
//! This crate provides the HTTP interface for maintenance points: balances,
//! request eligibility, the maintenance project listing, the point-usage
//! report and ledger ingest.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  HCMS API                    │
//! │  ┌─────────────────────────────────────┐    │
//! │  │           HTTP Routes               │    │
//! │  │   /projects, /maintenance          │    │
//! │  │   /point-usage, /ledger            │    │
//! │  └─────────────────────────────────────┘    │
//! │           │              │           │      │
//! │           ▼              ▼           ▼      │
//! │  ┌─────────────┐ ┌─────────────┐ ┌────────┐ │
//! │  │  Handlers   │ │    DTOs     │ │ State  │ │
//! │  └─────────────┘ └─────────────┘ └────────┘ │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//!         hcms-store (PointsService) ──► hcms-core
//! ```
//!
//! # Endpoints
//!
//! ## Health
//! - `GET /healthz`, `GET /api/v1/health` - Service health check
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Points (company scoped)
//! - `GET /api/v1/projects/:id/points/remaining` - Current-cycle balance
//! - `GET /api/v1/projects/:id/eligibility` - New-request eligibility
//! - `GET /api/v1/maintenance/projects` - Projects with availability
//! - `GET /api/v1/point-usage` - Point-usage report
//!
//! ## Ledger (API key)
//! - `POST /api/v1/ledger/entries` - Append a ledger entry
//!
//! # Usage Example
//!
//! ```ignore
//! use hcms_api::{ApiConfig, AppState, AuthConfig, build_app};
//! use hcms_store::Fixture;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ApiConfig::from_env();
//!     let fixture = Fixture::load("fixture.json").await.unwrap();
//!
//!     let state = AppState::from_fixture(config, fixture)
//!         .await
//!         .unwrap()
//!         .with_auth(AuthConfig::from_env());
//!     let app = build_app(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:9011").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

// Re-export main types
pub use auth::{AuthConfig, AuthErrorResponse, CallerCompany, API_KEY_HEADER, COMPANY_HEADER};
pub use dto::*;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use metrics::{init_metrics, MetricsConfig};
pub use routes::{build_app, create_router, create_v1_router};
pub use state::{ApiConfig, AppState, Clock, ComponentHealthCheck, HealthStatus};

/// HCMS API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API port
pub const DEFAULT_PORT: u16 = 9011;

/// Start the API server
pub async fn start_server(state: AppState) -> Result<(), std::io::Error> {
    let addr = state.config.listen_addr.clone();
    let app = build_app(state);

    tracing::info!("Starting HCMS API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
