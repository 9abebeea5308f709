//! Balance Calculator
//!
//! Remaining points = current cycle allocation minus executed usage inside
//! the cycle window, floored at zero. Over-use is not an error; it simply
//! reads as zero remaining.

use crate::calendar::MonthArithmetic;
use crate::cycle::{CycleResolver, CycleStatus};
use crate::ledger::sum_usage;
use crate::types::{LedgerScope, PointLedgerEntry, Project};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Balance of a project for its current cycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBalance {
    pub cycle: CycleStatus,
    /// Points granted for the cycle
    pub total: u64,
    /// Executed usage inside the cycle window
    pub used: u64,
    /// `max(0, total - used)`
    pub remaining: u64,
}

impl PointBalance {
    fn inactive(cycle: CycleStatus) -> Self {
        Self {
            cycle,
            total: 0,
            used: 0,
            remaining: 0,
        }
    }

    /// Usage beyond the allocation, if any
    pub fn overdraft(&self) -> u64 {
        self.used.saturating_sub(self.total)
    }
}

/// Balance calculator
#[derive(Clone, Debug, Default)]
pub struct BalanceCalculator {
    resolver: CycleResolver,
}

impl BalanceCalculator {
    pub fn new(resolver: CycleResolver) -> Self {
        Self { resolver }
    }

    /// Calculator using the given month strategy
    pub fn with_months(months: Arc<dyn MonthArithmetic>) -> Self {
        Self::new(CycleResolver::new(months))
    }

    pub fn resolver(&self) -> &CycleResolver {
        &self.resolver
    }

    /// Full balance for `project` on `today`
    pub fn balance(
        &self,
        project: &Project,
        entries: &[PointLedgerEntry],
        today: NaiveDate,
    ) -> PointBalance {
        let status = self.resolver.resolve(project, today);
        let Some(cycle) = status.cycle().cloned() else {
            return PointBalance::inactive(status);
        };

        let scope = LedgerScope::new(project.id, project.company_id);
        let total = u64::try_from(cycle.points_available).unwrap_or(0);
        let used = sum_usage(entries, scope, cycle.usage_window());

        PointBalance {
            total,
            used,
            remaining: total.saturating_sub(used),
            cycle: status,
        }
    }

    /// Remaining points, never negative
    pub fn remaining_points(
        &self,
        project: &Project,
        entries: &[PointLedgerEntry],
        today: NaiveDate,
    ) -> u64 {
        self.balance(project, entries, today).remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{at, usage};
    use crate::types::{CompanyId, ProjectId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project() -> Project {
        Project::new(ProjectId(10), CompanyId(1), "Main site")
            .with_contract(date(2024, 1, 1), date(2025, 1, 1))
            .with_allocation(100)
    }

    #[test]
    fn test_remaining_subtracts_cycle_usage() {
        let entries = vec![
            usage(1, 120, at(2024, 2, 1, 9)),
            usage(2, 80, at(2024, 5, 1, 9)),
            usage(3, 300, at(2024, 8, 1, 9)),
        ];
        let calc = BalanceCalculator::default();

        let balance = calc.balance(&project(), &entries, date(2024, 3, 1));
        assert_eq!(balance.total, 600);
        assert_eq!(balance.used, 200);
        assert_eq!(balance.remaining, 400);

        assert_eq!(calc.remaining_points(&project(), &entries, date(2024, 9, 1)), 300);
    }

    #[test]
    fn test_overuse_floors_at_zero() {
        let entries = vec![usage(1, 700, at(2024, 2, 1, 9))];
        let balance = BalanceCalculator::default().balance(&project(), &entries, date(2024, 3, 1));

        assert_eq!(balance.remaining, 0);
        assert_eq!(balance.overdraft(), 100);
    }

    #[test]
    fn test_inactive_projects_have_nothing_remaining() {
        let calc = BalanceCalculator::default();
        let entries: Vec<PointLedgerEntry> = Vec::new();

        let no_dates = Project::new(ProjectId(10), CompanyId(1), "Pending").with_allocation(100);
        let no_allocation = project().with_allocation(0);

        for today in [date(2023, 6, 1), date(2024, 6, 1), date(2026, 6, 1)] {
            assert_eq!(calc.remaining_points(&no_dates, &entries, today), 0);
            assert_eq!(calc.remaining_points(&no_allocation, &entries, today), 0);
        }
        assert_eq!(calc.remaining_points(&project(), &entries, date(2023, 12, 31)), 0);
        assert_eq!(calc.remaining_points(&project(), &entries, date(2025, 1, 2)), 0);
    }

    #[test]
    fn test_foreign_company_usage_is_ignored() {
        let mut foreign = usage(1, 500, at(2024, 2, 1, 9));
        foreign.company_id = CompanyId(99);
        let remaining =
            BalanceCalculator::default().remaining_points(&project(), &[foreign], date(2024, 3, 1));
        assert_eq!(remaining, 600);
    }
}
