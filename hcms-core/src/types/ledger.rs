//! Point Ledger Types
//!
//! The ledger is append-only. Entries are never mutated or deleted; a
//! correction is a new entry.

use super::common::{CommentId, CompanyId, EntryId, LedgerScope, ProjectId, TicketId};
use crate::calendar::DateTimeRange;
use crate::error::{HcmsError, HcmsResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Ledger entry kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum LedgerKind {
    /// Points added to the project
    Charge,
    /// Points consumed by work; the only kind that counts against a cycle
    Usage,
    /// Accrual awaiting confirmation
    AccrualPending,
}

impl LedgerKind {
    /// Source code (1=charge, 2=usage, 3=accrual)
    pub fn code(self) -> i32 {
        match self {
            LedgerKind::Charge => 1,
            LedgerKind::Usage => 2,
            LedgerKind::AccrualPending => 3,
        }
    }

    pub fn from_code(code: i32) -> HcmsResult<Self> {
        match code {
            1 => Ok(LedgerKind::Charge),
            2 => Ok(LedgerKind::Usage),
            3 => Ok(LedgerKind::AccrualPending),
            other => Err(HcmsError::unknown_code("kind", other)),
        }
    }
}

impl TryFrom<i32> for LedgerKind {
    type Error = HcmsError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<LedgerKind> for i32 {
    fn from(kind: LedgerKind) -> Self {
        kind.code()
    }
}

/// Execution state of a ledger entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ExecutionState {
    Draft,
    Executed,
}

impl ExecutionState {
    /// Source code (1=draft, 2=executed)
    pub fn code(self) -> i32 {
        match self {
            ExecutionState::Draft => 1,
            ExecutionState::Executed => 2,
        }
    }

    pub fn from_code(code: i32) -> HcmsResult<Self> {
        match code {
            1 => Ok(ExecutionState::Draft),
            2 => Ok(ExecutionState::Executed),
            other => Err(HcmsError::unknown_code("state", other)),
        }
    }
}

impl TryFrom<i32> for ExecutionState {
    type Error = HcmsError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<ExecutionState> for i32 {
    fn from(state: ExecutionState) -> Self {
        state.code()
    }
}

/// Point ledger entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointLedgerEntry {
    pub id: EntryId,
    pub project_id: ProjectId,
    pub company_id: CompanyId,
    /// Originating maintenance ticket
    #[serde(default)]
    pub ticket_id: Option<TicketId>,
    /// Originating ticket comment
    #[serde(default)]
    pub comment_id: Option<CommentId>,
    #[serde(default)]
    pub content: String,
    /// Stored magnitude; the sign is implied by `kind`
    pub amount: i64,
    pub kind: LedgerKind,
    pub state: ExecutionState,
    /// Worker type recorded on the entry itself
    #[serde(default)]
    pub worker_type: Option<i32>,
    pub occurred_at: NaiveDateTime,
}

impl PointLedgerEntry {
    /// Absolute point value of the entry
    pub fn magnitude(&self) -> u64 {
        self.amount.unsigned_abs()
    }

    pub fn scope(&self) -> LedgerScope {
        LedgerScope::new(self.project_id, self.company_id)
    }

    /// Executed usage entry
    pub fn is_executed_usage(&self) -> bool {
        self.kind == LedgerKind::Usage && self.state == ExecutionState::Executed
    }
}

/// Entry to be appended to the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
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
    pub occurred_at: NaiveDateTime,
}

impl NewLedgerEntry {
    /// Amounts are stored as magnitudes
    pub fn validate(&self) -> HcmsResult<()> {
        if self.amount < 0 {
            return Err(HcmsError::InvalidLedgerAmount {
                amount: self.amount,
                reason: "amount must be a non-negative magnitude".to_string(),
            });
        }
        Ok(())
    }

    /// Assign an identifier
    pub fn into_entry(self, id: EntryId) -> PointLedgerEntry {
        PointLedgerEntry {
            id,
            project_id: self.project_id,
            company_id: self.company_id,
            ticket_id: self.ticket_id,
            comment_id: self.comment_id,
            content: self.content,
            amount: self.amount,
            kind: self.kind,
            state: self.state,
            worker_type: self.worker_type,
            occurred_at: self.occurred_at,
        }
    }
}

/// Ledger query filter.
///
/// Every populated field must match. Collaborators may return rows in any
/// order; consumers impose their own ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub project_id: Option<ProjectId>,
    pub company_id: Option<CompanyId>,
    pub kind: Option<LedgerKind>,
    pub state: Option<ExecutionState>,
    pub window: Option<DateTimeRange>,
}

impl LedgerFilter {
    /// All entries of a scope
    pub fn for_scope(scope: LedgerScope) -> Self {
        Self {
            project_id: Some(scope.project_id),
            company_id: Some(scope.company_id),
            ..Default::default()
        }
    }

    /// Executed usage entries of a scope within `window`
    pub fn executed_usage(scope: LedgerScope, window: DateTimeRange) -> Self {
        Self::for_scope(scope)
            .with_kind(LedgerKind::Usage)
            .with_state(ExecutionState::Executed)
            .with_window(window)
    }

    pub fn with_kind(mut self, kind: LedgerKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_state(mut self, state: ExecutionState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_window(mut self, window: DateTimeRange) -> Self {
        self.window = Some(window);
        self
    }

    pub fn matches(&self, entry: &PointLedgerEntry) -> bool {
        self.project_id.map_or(true, |id| entry.project_id == id)
            && self.company_id.map_or(true, |id| entry.company_id == id)
            && self.kind.map_or(true, |kind| entry.kind == kind)
            && self.state.map_or(true, |state| entry.state == state)
            && self
                .window
                .map_or(true, |window| window.contains(entry.occurred_at))
    }
}
