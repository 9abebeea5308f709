//! Cycle Resolver
//!
//! Maps a query date onto the 6-month allocation cycle of a contract.
//!
//! ```text
//! contract_start                                              contract_end
//!   |-- cycle 0 (months 0..6) --|-- cycle 1 (months 6..12) --|-- ... --|
//!                                ^ month 6 belongs to cycle 1
//! ```
//!
//! The last cycle is truncated at the contract's total month count, so a
//! contract shorter than six months has a single short cycle.

use crate::calendar::{months_between, start_of_day, DateTimeRange, MonthArithmetic};
use crate::types::Project;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Months per allocation cycle
pub const CYCLE_LENGTH_MONTHS: i32 = 6;

/// Resolved allocation cycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Zero-based cycle number within the contract
    pub index: u32,
    /// Month offset of the cycle start from the contract start
    pub start_month: i32,
    /// Month offset of the cycle end, truncated at the contract length
    pub end_month: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub months_in_cycle: i32,
    /// Points granted for the whole cycle
    pub points_available: i64,
    /// Boundaries were produced by an approximate month strategy
    pub approximate_boundaries: bool,
}

impl Cycle {
    /// Window used for balance aggregation: `[start_date, end_date]` at midnight.
    pub fn usage_window(&self) -> DateTimeRange {
        DateTimeRange::closed(start_of_day(self.start_date), start_of_day(self.end_date))
    }
}

/// Why no cycle is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveReason {
    MissingContractDates,
    NoAllocation,
    NotStarted,
    Expired,
}

/// Result of cycle resolution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleStatus {
    Active(Cycle),
    Inactive { reason: InactiveReason },
}

impl CycleStatus {
    pub fn cycle(&self) -> Option<&Cycle> {
        match self {
            CycleStatus::Active(cycle) => Some(cycle),
            CycleStatus::Inactive { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CycleStatus::Active(_))
    }

    /// Points granted, zero when inactive
    pub fn points_available(&self) -> i64 {
        self.cycle().map_or(0, |cycle| cycle.points_available)
    }
}

/// Resolve the cycle containing `today`.
///
/// Total over all inputs: absent dates, non-positive allocation and dates
/// outside the contract all resolve to [`CycleStatus::Inactive`].
pub fn resolve_cycle(
    contract_start: Option<NaiveDate>,
    contract_end: Option<NaiveDate>,
    monthly_points: Option<i64>,
    today: NaiveDate,
    months: &dyn MonthArithmetic,
) -> CycleStatus {
    let (start, end) = match (contract_start, contract_end) {
        (Some(start), Some(end)) => (start, end),
        _ => return inactive(InactiveReason::MissingContractDates),
    };
    let monthly = match monthly_points {
        Some(points) if points > 0 => points,
        _ => return inactive(InactiveReason::NoAllocation),
    };
    if today < start {
        return inactive(InactiveReason::NotStarted);
    }
    if today > end {
        return inactive(InactiveReason::Expired);
    }

    let total_months = months_between(start, end);
    let elapsed = months_between(start, today);

    let index = elapsed.div_euclid(CYCLE_LENGTH_MONTHS);
    let start_month = index * CYCLE_LENGTH_MONTHS;
    let end_month = ((index + 1) * CYCLE_LENGTH_MONTHS).min(total_months);
    let months_in_cycle = (end_month - start_month).max(0);

    CycleStatus::Active(Cycle {
        index: index.max(0) as u32,
        start_month,
        end_month,
        start_date: months.add_months(start, start_month.max(0) as u32),
        end_date: months.add_months(start, end_month.max(0) as u32),
        months_in_cycle,
        points_available: i64::from(months_in_cycle).saturating_mul(monthly),
        approximate_boundaries: months.is_approximate(),
    })
}

fn inactive(reason: InactiveReason) -> CycleStatus {
    tracing::debug!(?reason, "Cycle inactive");
    CycleStatus::Inactive { reason }
}

/// Cycle resolver bound to one month-arithmetic strategy
#[derive(Clone, Debug)]
pub struct CycleResolver {
    months: Arc<dyn MonthArithmetic>,
}

impl CycleResolver {
    pub fn new(months: Arc<dyn MonthArithmetic>) -> Self {
        Self { months }
    }

    pub fn months(&self) -> &Arc<dyn MonthArithmetic> {
        &self.months
    }

    /// Current cycle of `project` on `today`
    pub fn resolve(&self, project: &Project, today: NaiveDate) -> CycleStatus {
        resolve_cycle(
            project.contract_start_date,
            project.contract_end_date,
            project.monthly_point_allocation,
            today,
            self.months.as_ref(),
        )
    }
}

impl Default for CycleResolver {
    fn default() -> Self {
        Self::new(Arc::new(crate::calendar::CalendarMonths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarMonths, ThirtyDayMonths};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(start: NaiveDate, end: NaiveDate, monthly: i64, today: NaiveDate) -> CycleStatus {
        resolve_cycle(Some(start), Some(end), Some(monthly), today, &CalendarMonths)
    }

    #[test]
    fn test_twelve_month_contract_first_cycle() {
        let status = resolve(date(2024, 1, 1), date(2025, 1, 1), 100, date(2024, 6, 30));
        let cycle = status.cycle().unwrap();

        assert_eq!(cycle.index, 0);
        assert_eq!(cycle.start_month, 0);
        assert_eq!(cycle.end_month, 6);
        assert_eq!(cycle.points_available, 600);
        assert_eq!(cycle.start_date, date(2024, 1, 1));
        assert_eq!(cycle.end_date, date(2024, 7, 1));
    }

    #[test]
    fn test_month_six_boundary_falls_into_second_cycle() {
        let status = resolve(date(2024, 1, 1), date(2025, 1, 1), 100, date(2024, 7, 1));
        let cycle = status.cycle().unwrap();

        assert_eq!(cycle.index, 1);
        assert_eq!(cycle.start_month, 6);
        assert_eq!(cycle.end_month, 12);
        assert_eq!(cycle.points_available, 600);
        assert_eq!(cycle.start_date, date(2024, 7, 1));
        assert_eq!(cycle.end_date, date(2025, 1, 1));
    }

    #[test]
    fn test_short_contract_single_cycle() {
        let start = date(2024, 1, 1);
        let end = date(2024, 5, 1);
        for today in [start, date(2024, 2, 14), date(2024, 4, 30), end] {
            let status = resolve(start, end, 50, today);
            let cycle = status.cycle().unwrap();
            assert_eq!(cycle.index, 0);
            assert_eq!(cycle.months_in_cycle, 4);
            assert_eq!(cycle.points_available, 200);
            assert_eq!(cycle.end_date, end);
        }
    }

    #[test]
    fn test_final_cycle_is_truncated() {
        let status = resolve(date(2024, 1, 10), date(2024, 10, 10), 30, date(2024, 8, 1));
        let cycle = status.cycle().unwrap();
        assert_eq!(cycle.index, 1);
        assert_eq!(cycle.months_in_cycle, 3);
        assert_eq!(cycle.points_available, 90);
    }

    #[test]
    fn test_zero_length_contract_grants_nothing() {
        let status = resolve(date(2024, 3, 1), date(2024, 3, 20), 100, date(2024, 3, 10));
        assert_eq!(status.points_available(), 0);
    }

    #[test]
    fn test_inactive_reasons() {
        let months = CalendarMonths;
        let start = date(2024, 1, 1);
        let end = date(2024, 12, 31);

        assert_eq!(
            resolve_cycle(None, Some(end), Some(100), start, &months),
            CycleStatus::Inactive {
                reason: InactiveReason::MissingContractDates
            }
        );
        assert_eq!(
            resolve_cycle(Some(start), Some(end), Some(0), start, &months),
            CycleStatus::Inactive {
                reason: InactiveReason::NoAllocation
            }
        );
        assert_eq!(
            resolve_cycle(Some(start), Some(end), None, start, &months),
            CycleStatus::Inactive {
                reason: InactiveReason::NoAllocation
            }
        );
        assert_eq!(
            resolve_cycle(Some(start), Some(end), Some(100), date(2023, 12, 31), &months),
            CycleStatus::Inactive {
                reason: InactiveReason::NotStarted
            }
        );
        assert_eq!(
            resolve_cycle(Some(start), Some(end), Some(100), date(2025, 1, 1), &months),
            CycleStatus::Inactive {
                reason: InactiveReason::Expired
            }
        );
    }

    #[test]
    fn test_contract_end_day_is_active() {
        let status = resolve(date(2024, 1, 1), date(2024, 12, 31), 100, date(2024, 12, 31));
        assert!(status.is_active());
    }

    #[test]
    fn test_thirty_day_boundaries_are_flagged() {
        let status = resolve_cycle(
            Some(date(2024, 1, 1)),
            Some(date(2025, 1, 1)),
            Some(100),
            date(2024, 7, 1),
            &ThirtyDayMonths,
        );
        let cycle = status.cycle().unwrap();
        assert!(cycle.approximate_boundaries);
        assert_eq!(cycle.start_date, date(2024, 6, 29));
    }

    #[test]
    fn test_usage_window_is_closed() {
        let status = resolve(date(2024, 1, 1), date(2025, 1, 1), 100, date(2024, 3, 1));
        let window = status.cycle().unwrap().usage_window();
        assert!(window.contains(start_of_day(date(2024, 7, 1))));
        assert!(!window.contains(date(2024, 7, 1).and_hms_opt(0, 0, 1).unwrap()));
    }

    #[test]
    fn test_resolver_uses_project_fields() {
        let project = Project::new(crate::types::ProjectId(1), crate::types::CompanyId(1), "Site")
            .with_contract(date(2024, 1, 1), date(2025, 1, 1))
            .with_allocation(100);
        let resolver = CycleResolver::default();
        assert_eq!(resolver.resolve(&project, date(2024, 2, 1)).points_available(), 600);
    }
}
