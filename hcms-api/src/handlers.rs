//! API Handlers
//!
//! HTTP handler implementations for HCMS API endpoints. Every points query
//! is scoped to the [`CallerCompany`] resolved by the identity middleware.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use hcms_core::{CompanyId, MonthArithmeticKind, PointLedgerEntry, ProjectId, UsageReport};
use hcms_store::ProjectRepository;
use std::sync::Arc;

use crate::auth::CallerCompany;
use crate::dto::*;
use crate::error::ApiResult;
use crate::state::{AppState, ComponentHealthCheck, HealthStatus};

/// Health check handler
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let mut components = vec![];

    // A scoped lookup exercises the repository end to end
    match state.points.repository().list_projects(CompanyId(0)).await {
        Ok(_) => components.push(ComponentHealthCheck::healthy("store")),
        Err(err) => components.push(ComponentHealthCheck::unhealthy("store", err.to_string())),
    }

    if state.config.month_arithmetic == MonthArithmeticKind::ThirtyDay {
        components.push(ComponentHealthCheck::degraded(
            "points_engine",
            "approximate month arithmetic in use",
        ));
    } else {
        components.push(ComponentHealthCheck::healthy("points_engine"));
    }

    let overall_status = if components.iter().all(|c| c.status == HealthStatus::Healthy) {
        "healthy"
    } else if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        "unhealthy"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status: overall_status.to_string(),
        version: state.config.version.clone(),
        uptime_secs: state.uptime_secs(),
        components: components
            .into_iter()
            .map(|c| ComponentHealth {
                name: c.name,
                status: c.status.as_str().to_string(),
                message: c.message,
            })
            .collect(),
    }))
}

/// Remaining points of a project in its current cycle
pub async fn get_remaining_points(
    State(state): State<Arc<AppState>>,
    Extension(CallerCompany(company_id)): Extension<CallerCompany>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<RemainingPointsResponse>> {
    let project_id = ProjectId(project_id);
    let balance = state
        .points
        .balance(company_id, project_id, state.clock.today())
        .await?;

    Ok(Json(RemainingPointsResponse::new(project_id, balance)))
}

/// Whether a new maintenance request may be opened
pub async fn get_eligibility(
    State(state): State<Arc<AppState>>,
    Extension(CallerCompany(company_id)): Extension<CallerCompany>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<EligibilityResponse>> {
    let project_id = ProjectId(project_id);
    let eligibility = state
        .points
        .eligibility(company_id, project_id, state.clock.today())
        .await?;

    Ok(Json(EligibilityResponse::new(project_id, eligibility)))
}

/// Every project of the caller's company with its availability
pub async fn list_maintenance_projects(
    State(state): State<Arc<AppState>>,
    Extension(CallerCompany(company_id)): Extension<CallerCompany>,
) -> ApiResult<Json<MaintenanceProjectsResponse>> {
    let projects: Vec<MaintenanceProjectDto> = state
        .points
        .maintenance_projects(company_id, state.clock.today())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(MaintenanceProjectsResponse {
        count: projects.len(),
        projects,
    }))
}

/// Point-usage report
pub async fn get_point_usage(
    State(state): State<Arc<AppState>>,
    Extension(CallerCompany(company_id)): Extension<CallerCompany>,
    Query(query): Query<PointUsageQuery>,
) -> ApiResult<Json<UsageReport>> {
    let pagination = query.pagination()?;
    let report = state
        .points
        .usage_report(
            company_id,
            query.requested_project(),
            query.filters(),
            pagination,
            state.clock.today(),
        )
        .await?;

    Ok(Json(report))
}

/// Append a ledger entry
pub async fn append_ledger_entry(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AppendLedgerEntryRequest>,
) -> ApiResult<(StatusCode, Json<PointLedgerEntry>)> {
    let entry = request.into_entry(state.clock.now())?;
    let stored = state.points.record_entry(entry).await?;
    crate::metrics::record_ledger_entry(stored.kind.code());

    Ok((StatusCode::CREATED, Json(stored)))
}
