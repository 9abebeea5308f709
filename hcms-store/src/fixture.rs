//! JSON fixtures
//!
//! Seed data for the in-memory store. Date fields accept either a plain date
//! (`"2024-01-01"`) or a timestamp (`"2024-01-01T09:30:00"`); both shapes are
//! normalized here, once, before anything reaches the engine.

use crate::error::StoreResult;
use chrono::NaiveDateTime;
use hcms_core::{
    CalendarValue, CommentId, CompanyId, EntryId, ExecutionState, LedgerKind,
    MaintenanceComment, PointLedgerEntry, Project, ProjectId, Ticket, TicketId,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project row as stored
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub company_id: CompanyId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub contract_start: Option<CalendarValue>,
    #[serde(default)]
    pub contract_end: Option<CalendarValue>,
    #[serde(default)]
    pub monthly_points: Option<i64>,
    #[serde(default)]
    pub created_at: Option<CalendarValue>,
}

impl ProjectRecord {
    pub fn normalize(self) -> Project {
        Project {
            id: self.id,
            company_id: self.company_id,
            title: self.title,
            contract_start_date: self.contract_start.map(CalendarValue::to_date),
            contract_end_date: self.contract_end.map(CalendarValue::to_date),
            monthly_point_allocation: self.monthly_points,
            created_at: self.created_at.map(CalendarValue::to_datetime),
        }
    }
}

/// Payment row as stored
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub project_id: ProjectId,
    /// 1 = completed
    pub status: i32,
}

/// Ledger row as stored
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: EntryId,
    pub project_id: ProjectId,
    pub company_id: CompanyId,
    #[serde(default)]
    pub ticket_id: Option<TicketId>,
    #[serde(default)]
    pub comment_id: Option<CommentId>,
    #[serde(default)]
    pub content: String,
    pub amount: i64,
    pub kind: LedgerKind,
    pub state: ExecutionState,
    #[serde(default)]
    pub worker_type: Option<i32>,
    pub occurred_at: CalendarValue,
}

impl LedgerRecord {
    pub fn normalize(self) -> PointLedgerEntry {
        PointLedgerEntry {
            id: self.id,
            project_id: self.project_id,
            company_id: self.company_id,
            ticket_id: self.ticket_id,
            comment_id: self.comment_id,
            content: self.content,
            amount: self.amount,
            kind: self.kind,
            state: self.state,
            worker_type: self.worker_type,
            occurred_at: self.occurred_at.to_datetime(),
        }
    }
}

/// Comment row as stored
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: CommentId,
    pub ticket_id: TicketId,
    #[serde(default)]
    pub writer: Option<hcms_core::WorkerIdentity>,
    #[serde(default)]
    pub worker_type: Option<i32>,
    #[serde(default)]
    pub point: i64,
    pub created_at: CalendarValue,
}

impl CommentRecord {
    pub fn normalize(self) -> MaintenanceComment {
        MaintenanceComment {
            id: self.id,
            ticket_id: self.ticket_id,
            writer: self.writer,
            worker_type: self.worker_type,
            point: self.point,
            created_at: self.created_at.to_datetime(),
        }
    }
}

/// Seed data set
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(default)]
    pub ledger: Vec<LedgerRecord>,
    /// Fixed "now" for reproducible offline queries
    #[serde(default)]
    pub now: Option<NaiveDateTime>,
}

impl Fixture {
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a fixture file
    pub async fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let fixture = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            projects = fixture.projects.len(),
            ledger_entries = fixture.ledger.len(),
            "Loaded fixture"
        );
        Ok(fixture)
    }
}
