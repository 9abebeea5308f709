//! HCMS Points Engine - Cycle Accounting and Eligibility
//!
//! Pure, synchronous domain logic behind the maintenance portal's
//! service-credit balance:
//! - **Calendar Utilities**: month counting, date normalization, month-addition strategies
//! - **Cycle Resolver**: maps a date onto the 6-month allocation cycle of a contract
//! - **Ledger Aggregator**: scoped usage sums, monthly series, per-worker breakdown
//! - **Balance Calculator**: remaining points floored at zero, eligibility gate
//! - **Reporting Assembler**: paginated history, monthly chart, multi-project summary
//!
//! # Data Flow
//!
//! ```text
//! Project ──> CycleResolver ──> Cycle window
//!                                   │
//! Ledger ──> sum_usage(scope, window) ──> BalanceCalculator ──> Eligibility
//!                                   │
//!                                   └──> ReportAssembler ──> UsageReport
//! ```
//!
//! Balance is always derived from the append-only ledger; nothing here is
//! cached or stored. Every balance and cycle function is total: missing
//! contract data or out-of-range dates produce zero points, never an error.

pub mod balance;
pub mod calendar;
pub mod cycle;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod reporting;
pub mod types;

// Re-export error types
pub use error::{HcmsError, HcmsResult};

// Re-export all types
pub use types::*;

pub use balance::{BalanceCalculator, PointBalance};
pub use calendar::{
    months_between, CalendarMonths, CalendarValue, DateTimeRange, MonthArithmetic,
    MonthArithmeticKind, ThirtyDayMonths,
};
pub use cycle::{resolve_cycle, Cycle, CycleResolver, CycleStatus, InactiveReason};
pub use gate::{is_eligible_for_new_request, BlockingReason, Eligibility};
pub use ledger::{monthly_usage_series, sum_usage, worker_breakdown, MonthlyUsage, WorkerUsage};
pub use reporting::{
    FilterPolicy, HistoryFilters, HistoryItem, IgnoredFilter, Page, Pagination,
    ProjectBalanceSummary, ReportAssembler, ReportData, ReportRequest, UsageReport,
    DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
