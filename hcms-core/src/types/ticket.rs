//! Maintenance Ticket Types
//!
//! Only the fields the reporting breakdowns need.

use super::common::{CommentId, CompanyId, ProjectId, TicketId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maintenance ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub company_id: CompanyId,
    pub project_id: ProjectId,
    pub title: String,
}

/// Person who wrote a ticket comment
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerIdentity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl WorkerIdentity {
    /// Display name, falling back to the username
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.username.as_deref().filter(|name| !name.is_empty()))
    }
}

/// Ticket comment that logged work
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceComment {
    pub id: CommentId,
    pub ticket_id: TicketId,
    #[serde(default)]
    pub writer: Option<WorkerIdentity>,
    #[serde(default)]
    pub worker_type: Option<i32>,
    /// Points logged by the comment
    #[serde(default)]
    pub point: i64,
    pub created_at: NaiveDateTime,
}
