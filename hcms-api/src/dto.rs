//! Data Transfer Objects
//!
//! Request and response DTOs for the HCMS API layer.

use chrono::{NaiveDate, NaiveDateTime};
use hcms_core::{
    BlockingReason, CommentId, CompanyId, CycleStatus, Eligibility, ExecutionState, HcmsResult,
    HistoryFilters, LedgerKind, NewLedgerEntry, Pagination, PointBalance, ProjectId, TicketId,
    DEFAULT_PER_PAGE,
};
use hcms_store::{ContractStatus, MaintenanceProjectStatus};
use serde::{Deserialize, Serialize};

// ============================================
// Balance DTOs
// ============================================

/// Remaining points of one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingPointsResponse {
    pub project_id: ProjectId,
    pub remaining_points: u64,
    /// Points granted for the current cycle
    pub total_points: u64,
    /// Executed usage inside the current cycle
    pub used_points: u64,
    pub cycle: CycleStatus,
}

impl RemainingPointsResponse {
    pub fn new(project_id: ProjectId, balance: PointBalance) -> Self {
        Self {
            project_id,
            remaining_points: balance.remaining,
            total_points: balance.total,
            used_points: balance.used,
            cycle: balance.cycle,
        }
    }
}

/// New-request eligibility of one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub project_id: ProjectId,
    pub eligible: bool,
    pub payment_completed: bool,
    pub contract_active: bool,
    pub remaining_points: u64,
    pub blocking_reasons: Vec<BlockingReason>,
}

impl EligibilityResponse {
    pub fn new(project_id: ProjectId, eligibility: Eligibility) -> Self {
        Self {
            project_id,
            eligible: eligibility.is_eligible(),
            blocking_reasons: eligibility.blocking_reasons(),
            payment_completed: eligibility.payment_completed,
            contract_active: eligibility.contract_active,
            remaining_points: eligibility.remaining_points,
        }
    }
}

// ============================================
// Maintenance Project DTOs
// ============================================

/// Project row of the maintenance listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceProjectDto {
    pub id: ProjectId,
    pub title: String,
    pub permit: bool,
    pub remaining_points: u64,
    pub contract_status: ContractStatus,
    pub contract_date: Option<NaiveDate>,
    pub contract_termination_date: Option<NaiveDate>,
}

impl From<MaintenanceProjectStatus> for MaintenanceProjectDto {
    fn from(status: MaintenanceProjectStatus) -> Self {
        Self {
            id: status.id,
            title: status.title,
            permit: status.permit,
            remaining_points: status.remaining_points,
            contract_status: status.contract_status,
            contract_date: status.contract_start_date,
            contract_termination_date: status.contract_end_date,
        }
    }
}

/// Maintenance project listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceProjectsResponse {
    pub projects: Vec<MaintenanceProjectDto>,
    pub count: usize,
}

// ============================================
// Point Usage DTOs
// ============================================

/// Query string of the point-usage report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointUsageQuery {
    /// Unknown or non-numeric ids fall back to the latest active project
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub point_type: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PointUsageQuery {
    pub fn requested_project(&self) -> Option<ProjectId> {
        self.project_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(ProjectId)
    }

    pub fn filters(&self) -> HistoryFilters {
        HistoryFilters {
            search_text: self.search_text.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            point_type: self.point_type.clone(),
        }
    }

    pub fn pagination(&self) -> HcmsResult<Pagination> {
        Pagination::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

// ============================================
// Ledger DTOs
// ============================================

/// Request to append a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendLedgerEntryRequest {
    pub project_id: i64,
    pub company_id: i64,
    #[serde(default)]
    pub ticket_id: Option<i64>,
    #[serde(default)]
    pub comment_id: Option<i64>,
    #[serde(default)]
    pub content: String,
    /// Non-negative magnitude
    pub amount: i64,
    /// 1 = charge, 2 = usage, 3 = accrual pending
    pub kind: i32,
    /// 1 = draft, 2 = executed
    pub state: i32,
    #[serde(default)]
    pub worker_type: Option<i32>,
    /// Defaults to the service clock
    #[serde(default)]
    pub occurred_at: Option<NaiveDateTime>,
}

impl AppendLedgerEntryRequest {
    /// Convert into a domain entry, resolving the source codes
    pub fn into_entry(self, now: NaiveDateTime) -> HcmsResult<NewLedgerEntry> {
        let entry = NewLedgerEntry {
            project_id: ProjectId(self.project_id),
            company_id: CompanyId(self.company_id),
            ticket_id: self.ticket_id.map(TicketId),
            comment_id: self.comment_id.map(CommentId),
            content: self.content,
            amount: self.amount,
            kind: LedgerKind::from_code(self.kind)?,
            state: ExecutionState::from_code(self.state)?,
            worker_type: self.worker_type,
            occurred_at: self.occurred_at.unwrap_or(now),
        };
        entry.validate()?;
        Ok(entry)
    }
}

// ============================================
// Health DTOs
// ============================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Service version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Component health
    pub components: Vec<ComponentHealth>,
}

/// Component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Status
    pub status: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcms_core::HcmsError;

    fn request(kind: i32, state: i32, amount: i64) -> AppendLedgerEntryRequest {
        AppendLedgerEntryRequest {
            project_id: 10,
            company_id: 1,
            ticket_id: Some(5),
            comment_id: None,
            content: "Backup restore".to_string(),
            amount,
            kind,
            state,
            worker_type: None,
            occurred_at: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_append_request_conversion() {
        let entry = request(2, 2, 40).into_entry(now()).unwrap();
        assert_eq!(entry.kind, LedgerKind::Usage);
        assert_eq!(entry.state, ExecutionState::Executed);
        assert_eq!(entry.ticket_id, Some(TicketId(5)));
        assert_eq!(entry.occurred_at, now());
    }

    #[test]
    fn test_append_request_rejects_bad_codes() {
        let err = request(9, 2, 40).into_entry(now()).unwrap_err();
        assert_eq!(err.code(), "HCMS-LEDGER-002");

        let err = request(2, 2, -1).into_entry(now()).unwrap_err();
        assert!(matches!(err, HcmsError::InvalidLedgerAmount { .. }));
    }

    #[test]
    fn test_point_usage_query_defaults() {
        let query = PointUsageQuery::default();
        let pagination = query.pagination().unwrap();
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.per_page(), 20);
        assert_eq!(query.requested_project(), None);
    }

    #[test]
    fn test_point_usage_query_parsing() {
        let query = PointUsageQuery {
            project_id: Some("abc".to_string()),
            per_page: Some(101),
            ..Default::default()
        };
        assert_eq!(query.requested_project(), None);
        assert!(query.pagination().is_err());

        let query = PointUsageQuery {
            project_id: Some(" 12 ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.requested_project(), Some(ProjectId(12)));
    }

    #[test]
    fn test_maintenance_project_dto_field_names() {
        let dto = MaintenanceProjectDto::from(MaintenanceProjectStatus {
            id: ProjectId(10),
            title: "Main site".to_string(),
            permit: true,
            remaining_points: 450,
            contract_status: ContractStatus::Active,
            contract_start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            contract_end_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["contract_status"], "active");
        assert_eq!(json["contract_date"], "2024-01-01");
        assert_eq!(json["contract_termination_date"], "2025-01-01");
    }
}
