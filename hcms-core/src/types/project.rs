//! Project and Payment Types

use super::common::{CompanyId, ProjectId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Source code for a completed payment
pub const PAYMENT_STATUS_COMPLETED: i32 = 1;

/// Maintenance contract project.
///
/// Dates are already normalized to calendar dates; the store converts raw
/// date-or-timestamp values once at ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub company_id: CompanyId,
    pub title: String,
    /// First day of the contract (inclusive)
    pub contract_start_date: Option<NaiveDate>,
    /// Last day of the contract (inclusive)
    pub contract_end_date: Option<NaiveDate>,
    /// Points granted per elapsed month
    pub monthly_point_allocation: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Project {
    pub fn new(id: ProjectId, company_id: CompanyId, title: impl Into<String>) -> Self {
        Self {
            id,
            company_id,
            title: title.into(),
            contract_start_date: None,
            contract_end_date: None,
            monthly_point_allocation: None,
            created_at: None,
        }
    }

    /// Set contract period
    pub fn with_contract(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.contract_start_date = Some(start);
        self.contract_end_date = Some(end);
        self
    }

    /// Set monthly allocation
    pub fn with_allocation(mut self, points: i64) -> Self {
        self.monthly_point_allocation = Some(points);
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Allocation when it is positive
    pub fn positive_allocation(&self) -> Option<i64> {
        self.monthly_point_allocation.filter(|points| *points > 0)
    }

    /// Whether `today` lies within the contract period (both ends inclusive)
    pub fn contract_covers(&self, today: NaiveDate) -> bool {
        match (self.contract_start_date, self.contract_end_date) {
            (Some(start), Some(end)) => start <= today && today <= end,
            _ => false,
        }
    }
}

/// Payment state of a project as consumed by the eligibility gate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub completed: bool,
}

impl PaymentStatus {
    pub fn completed() -> Self {
        Self { completed: true }
    }

    pub fn incomplete() -> Self {
        Self { completed: false }
    }

    /// Derive from raw payment status codes recorded for a project
    pub fn from_codes<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        Self {
            completed: codes
                .into_iter()
                .any(|code| code == PAYMENT_STATUS_COMPLETED),
        }
    }
}
