//! HCMS Error Codes Registry
//!
//! Error code format: HCMS-{area}-{sequence}
//! - HCMS-PAGE: Pagination errors
//! - HCMS-FILTER: Report filter errors
//! - HCMS-SCOPE: Company scoping violations
//! - HCMS-LEDGER: Ledger entry errors
//!
//! Balance and cycle computations never produce these errors; they are total
//! over well-shaped inputs. Errors only arise at the edges (caller-supplied
//! pagination, filters, ownership and new ledger rows).

use thiserror::Error;

/// HCMS Result type
pub type HcmsResult<T> = Result<T, HcmsError>;

/// HCMS Error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HcmsError {
    /// [HCMS-PAGE-001] Page or page size out of range
    #[error("[HCMS-PAGE-001] Invalid pagination: page {page}, per_page {per_page}")]
    InvalidPagination { page: u32, per_page: u32 },

    /// [HCMS-FILTER-001] Report filter could not be parsed
    #[error("[HCMS-FILTER-001] Invalid {field} filter: {value:?}")]
    InvalidFilter { field: String, value: String },

    /// [HCMS-SCOPE-001] Project is not owned by the calling company
    #[error("[HCMS-SCOPE-001] Project {project_id} is not accessible to company {company_id}")]
    ProjectNotInScope { project_id: i64, company_id: i64 },

    /// [HCMS-LEDGER-001] Ledger amount must be a non-negative magnitude
    #[error("[HCMS-LEDGER-001] Invalid ledger amount {amount}: {reason}")]
    InvalidLedgerAmount { amount: i64, reason: String },

    /// [HCMS-LEDGER-002] Unknown source code for a ledger field
    #[error("[HCMS-LEDGER-002] Unknown {field} code {code}")]
    UnknownCode { field: String, code: i32 },
}

impl HcmsError {
    /// Create an invalid filter error
    pub fn invalid_filter(field: impl Into<String>, value: impl Into<String>) -> Self {
        HcmsError::InvalidFilter {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an unknown code error
    pub fn unknown_code(field: impl Into<String>, code: i32) -> Self {
        HcmsError::UnknownCode {
            field: field.into(),
            code,
        }
    }

    /// Registry code of this error
    pub fn code(&self) -> &'static str {
        match self {
            HcmsError::InvalidPagination { .. } => "HCMS-PAGE-001",
            HcmsError::InvalidFilter { .. } => "HCMS-FILTER-001",
            HcmsError::ProjectNotInScope { .. } => "HCMS-SCOPE-001",
            HcmsError::InvalidLedgerAmount { .. } => "HCMS-LEDGER-001",
            HcmsError::UnknownCode { .. } => "HCMS-LEDGER-002",
        }
    }
}
